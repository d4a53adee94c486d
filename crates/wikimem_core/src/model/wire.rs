//! Wire DTOs exchanged with the backend process.
//!
//! # Responsibility
//! - Mirror the backend's snake_case, unix-seconds JSON shapes exactly.
//! - Convert DTOs into the internal model types on arrival.
//!
//! # Invariants
//! - DTOs carry no behavior; conversion is lossless field mapping.

use serde::{Deserialize, Serialize};

use crate::model::memory::{MemoryDetail, MemorySearchResult, MemorySummary};

/// List-call item as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySummaryDto {
    pub id: String,
    pub title: String,
    pub updated_at: i64,
}

/// Load/save response as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDetailDto {
    pub id: String,
    pub title: String,
    pub updated_at: i64,
    pub body: String,
}

/// Search hit as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySearchResultDto {
    pub id: String,
    pub title: String,
    pub updated_at: i64,
    pub snippet: String,
}

/// Save request body. `id: None` asks the backend to assign one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMemoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub body: String,
}

impl From<MemorySummaryDto> for MemorySummary {
    fn from(dto: MemorySummaryDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            updated_at: dto.updated_at,
        }
    }
}

impl From<MemoryDetailDto> for MemoryDetail {
    fn from(dto: MemoryDetailDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            updated_at: dto.updated_at,
            body: dto.body,
        }
    }
}

impl From<MemorySearchResultDto> for MemorySearchResult {
    fn from(dto: MemorySearchResultDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            updated_at: dto.updated_at,
            snippet: dto.snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryDetailDto, SaveMemoryPayload};
    use crate::model::memory::MemoryDetail;

    #[test]
    fn detail_dto_decodes_snake_case_and_converts() {
        let dto: MemoryDetailDto = serde_json::from_str(
            r##"{"id":"m-1","title":"Plan","updated_at":1700000000,"body":"# Plan\n"}"##,
        )
        .expect("detail payload should decode");
        let detail = MemoryDetail::from(dto);
        assert_eq!(detail.id, "m-1");
        assert_eq!(detail.updated_at, 1_700_000_000);
        assert_eq!(detail.body, "# Plan\n");
    }

    #[test]
    fn save_payload_omits_absent_id() {
        let encoded = serde_json::to_string(&SaveMemoryPayload {
            id: None,
            title: "Untitled memory".to_string(),
            body: String::new(),
        })
        .expect("payload should encode");
        assert!(!encoded.contains("\"id\""));
    }
}
