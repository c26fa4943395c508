use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ordering applied to the filtered collection
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum SortOption {
    /// Keep the pipeline's incoming order
    #[default]
    #[serde(rename = "none", alias = "")]
    #[strum(to_string = "none", serialize = "")]
    None,

    #[serde(rename = "alphabetical-asc", alias = "alphabetical")]
    #[strum(to_string = "alphabetical-asc", serialize = "alphabetical")]
    AlphabeticalAsc,

    #[serde(rename = "alphabetical-desc")]
    #[strum(to_string = "alphabetical-desc")]
    AlphabeticalDesc,

    #[serde(rename = "salary-asc", alias = "salary-low-high")]
    #[strum(to_string = "salary-asc", serialize = "salary-low-high")]
    SalaryAsc,

    #[serde(rename = "salary-desc", alias = "salary-high-low")]
    #[strum(to_string = "salary-desc", serialize = "salary-high-low")]
    SalaryDesc,
}

impl SortOption {
    /// Salary sorts read the top of a range, ascending sorts the bottom
    pub fn prefers_higher_salary(self) -> bool {
        matches!(self, SortOption::SalaryDesc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("salary-desc".parse::<SortOption>().unwrap(), SortOption::SalaryDesc);
        assert_eq!("alphabetical".parse::<SortOption>().unwrap(), SortOption::AlphabeticalAsc);
        assert_eq!("salary-low-high".parse::<SortOption>().unwrap(), SortOption::SalaryAsc);
        assert_eq!(SortOption::AlphabeticalDesc.to_string(), "alphabetical-desc");
        assert!("sideways".parse::<SortOption>().is_err());
    }

    #[test]
    fn test_serde() {
        let option: SortOption = serde_json::from_str(r#""salary-high-low""#).unwrap();
        assert_eq!(option, SortOption::SalaryDesc);
        assert_eq!(serde_json::to_string(&SortOption::None).unwrap(), r#""none""#);
        assert_eq!(SortOption::default(), SortOption::None);
    }
}
