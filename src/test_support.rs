//! Fixture builders shared by unit tests.

use crate::catalog::{
    AiIndexing, Category, ContentId, ContentItem, ContentType, EstimatedTime, Format, Grade,
    SkillCode, Stage, Subject, Visibility,
};

/// Lower-secondary practical lesson for 8º with one subject, category and code.
pub fn item(id: &str) -> ContentItem {
    ContentItem {
        id: ContentId(id.to_string()),
        title: format!("Aula {id}"),
        stage: Stage::LowerSecondary,
        grades: [Grade::Eighth].into(),
        subjects: [Subject::TechnologyRobotics].into(),
        categories: [Category::BasicElectronics].into(),
        content_type: ContentType::Practical,
        formats: [Format::Pdf].into(),
        estimated_time: EstimatedTime::OneClass,
        curricular_skill_codes: [SkillCode("EF08CI02".to_string())].into(),
        short_description: String::new(),
        keywords: Vec::new(),
        file_ids: Vec::new(),
        ai_indexing: AiIndexing::default(),
        visibility: Visibility::Public,
        author: "Admin".to_string(),
        created_at: "2023-10-26T10:00:00Z".to_string(),
        updated_at: "2023-10-26T10:00:00Z".to_string(),
    }
}

/// `item` with stage and grades replaced, then adjusted by `edit`.
pub fn item_with(
    id: &str,
    stage: Stage,
    grades: &[Grade],
    edit: impl FnOnce(&mut ContentItem),
) -> ContentItem {
    let mut out = item(id);
    out.stage = stage;
    out.grades = grades.iter().copied().collect();
    edit(&mut out);
    out
}
