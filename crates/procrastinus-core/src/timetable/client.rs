//! Module timetable data source.
//!
//! NUSMods publishes one JSON document per module and academic year at
//! `{base}/{2024-2025}/modules/{CODE}.json`. A 404 means the module is not
//! offered that year and is reported as `Ok(None)`.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Default public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.nusmods.com/v2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleTimetable {
    pub module_code: String,
    #[serde(default)]
    pub semester_data: Vec<SemesterData>,
}

impl ModuleTimetable {
    pub fn lessons(&self, semester: u8) -> &[Lesson] {
        self.semester_data
            .iter()
            .find(|s| s.semester == semester)
            .map(|s| s.timetable.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterData {
    pub semester: u8,
    #[serde(default)]
    pub timetable: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub class_no: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub weeks: LessonWeeks,
    #[serde(default)]
    pub venue: String,
    pub day: String,
    pub lesson_type: String,
}

/// Recurrence of a lesson. Most lessons list teaching weeks; a few run on a
/// date range instead, which is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LessonWeeks {
    Numbered(Vec<u32>),
    DateRange(serde_json::Value),
}

impl Default for LessonWeeks {
    fn default() -> Self {
        LessonWeeks::Numbered(Vec::new())
    }
}

impl LessonWeeks {
    /// Teaching weeks, or `None` when the lesson runs every week.
    pub fn numbered(&self) -> Option<Vec<u32>> {
        match self {
            LessonWeeks::Numbered(weeks) if !weeks.is_empty() => Some(weeks.clone()),
            _ => None,
        }
    }
}

/// Where module timetables come from.
pub trait TimetableSource {
    /// Fetch `code` for `academic_year` (`AY2024/2025`). `Ok(None)` when the
    /// module does not exist.
    fn fetch_module(
        &self,
        academic_year: &str,
        code: &str,
    ) -> impl Future<Output = Result<Option<ModuleTimetable>, ImportError>> + Send;
}

/// HTTP client for the NUSMods API.
#[derive(Debug, Clone)]
pub struct NusModsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NusModsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `AY2024/2025` -> `https://.../2024-2025/modules/CS1010.json`
    pub fn module_url(&self, academic_year: &str, code: &str) -> String {
        let year = academic_year.trim_start_matches("AY").replace('/', "-");
        format!("{}/{}/modules/{}.json", self.base_url, year, code)
    }
}

impl Default for NusModsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TimetableSource for NusModsClient {
    async fn fetch_module(
        &self,
        academic_year: &str,
        code: &str,
    ) -> Result<Option<ModuleTimetable>, ImportError> {
        let url = self.module_url(academic_year, code);
        tracing::debug!(%url, "fetching module timetable");
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ImportError::Status {
                module: code.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Some(resp.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_url_uses_dashed_year() {
        let client = NusModsClient::new("https://api.nusmods.com/v2/");
        assert_eq!(
            client.module_url("AY2024/2025", "CS1010"),
            "https://api.nusmods.com/v2/2024-2025/modules/CS1010.json"
        );
    }

    #[test]
    fn lesson_weeks_accepts_both_shapes() {
        let numbered: LessonWeeks = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(numbered.numbered(), Some(vec![1, 2, 3]));
        let ranged: LessonWeeks =
            serde_json::from_str(r#"{"start":"2024-08-12","end":"2024-11-15"}"#).unwrap();
        assert_eq!(ranged.numbered(), None);
    }

    #[test]
    fn lessons_for_missing_semester_are_empty() {
        let module = ModuleTimetable {
            module_code: "CS1010".to_string(),
            semester_data: vec![],
        };
        assert!(module.lessons(1).is_empty());
    }
}
