//! 商品状态

use serde::{Deserialize, Serialize};

/// 商品状态，数值与存储中的状态码一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr")]
#[repr(u8)]
pub enum ProductStatus {
    Draft = 0,
    Active = 1,
    Inactive = 2,
    Discontinued = 3,
    Pending = 4,
    UnderReview = 5,
    Rejected = 6,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 7] = [
        ProductStatus::Draft,
        ProductStatus::Active,
        ProductStatus::Inactive,
        ProductStatus::Discontinued,
        ProductStatus::Pending,
        ProductStatus::UnderReview,
        ProductStatus::Rejected,
    ];

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "Draft",
            ProductStatus::Active => "Active",
            ProductStatus::Inactive => "Inactive",
            ProductStatus::Discontinued => "Discontinued",
            ProductStatus::Pending => "Pending",
            ProductStatus::UnderReview => "UnderReview",
            ProductStatus::Rejected => "Rejected",
        }
    }

    /// 接受状态名（大小写、`_`/`-` 不敏感）或数值代码
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(code) = value.parse::<u8>() {
            return Self::from_code(code);
        }
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(&normalized))
    }

    /// 顾客可见
    pub fn is_listed(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 反序列化时同时接受 `"Active"` 与 `1`
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<StatusRepr> for ProductStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => {
                Self::from_code(code).ok_or_else(|| format!("unknown product status code {}", code))
            }
            StatusRepr::Name(name) => {
                Self::parse(&name).ok_or_else(|| format!("unknown product status '{}'", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_storage_values() {
        assert_eq!(ProductStatus::Draft.code(), 0);
        assert_eq!(ProductStatus::Active.code(), 1);
        assert_eq!(ProductStatus::Rejected.code(), 6);
        assert_eq!(ProductStatus::from_code(5), Some(ProductStatus::UnderReview));
        assert_eq!(ProductStatus::from_code(7), None);
    }

    #[test]
    fn test_parse_names_and_codes() {
        assert_eq!(ProductStatus::parse("under_review"), Some(ProductStatus::UnderReview));
        assert_eq!(ProductStatus::parse("ACTIVE"), Some(ProductStatus::Active));
        assert_eq!(ProductStatus::parse("3"), Some(ProductStatus::Discontinued));
        assert_eq!(ProductStatus::parse("archived"), None);
    }

    #[test]
    fn test_deserialize_accepts_name_or_code() {
        let by_name: ProductStatus = serde_json::from_str("\"Inactive\"").unwrap();
        let by_code: ProductStatus = serde_json::from_str("2").unwrap();
        assert_eq!(by_name, by_code);
        assert!(serde_json::from_str::<ProductStatus>("9").is_err());
        assert_eq!(serde_json::to_string(&ProductStatus::UnderReview).unwrap(), "\"UnderReview\"");
    }
}
