//! Field normalization shared by source adapters

use crate::models::{EMPLOYMENT_TYPE_NOT_SPECIFIED, LOCATION_NOT_SPECIFIED};
use std::collections::HashMap;

/// Structured postal address as published by a board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub locality: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves a location label from the fields a posting carries
#[derive(Debug, Clone, Default)]
pub struct LocationResolver {
    /// City name -> "City, Country"
    city_aliases: HashMap<String, String>,
}

impl LocationResolver {
    pub fn new(city_aliases: HashMap<String, String>) -> Self {
        let city_aliases = city_aliases
            .into_iter()
            .map(|(city, label)| (city.trim().to_lowercase(), label))
            .collect();
        Self { city_aliases }
    }

    /// Flat location, then structured address, then placeholder
    pub fn resolve(&self, flat: Option<&str>, address: Option<&PostalAddress>) -> String {
        if let Some(location) = non_blank(flat) {
            return location.to_string();
        }

        if let Some(address) = address {
            if let Some(city) = non_blank(address.locality.as_deref()) {
                if let Some(label) = self.city_aliases.get(&city.to_lowercase()) {
                    return label.clone();
                }
                return match non_blank(address.region.as_deref()) {
                    Some(region) => format!("{city}, {region}"),
                    None => city.to_string(),
                };
            }
        }

        LOCATION_NOT_SPECIFIED.to_string()
    }
}

/// Turn a compact token such as `FullTime` into `Full time`
pub fn normalize_employment_type(raw: Option<&str>) -> String {
    let Some(raw) = non_blank(raw) else {
        return EMPLOYMENT_TYPE_NOT_SPECIFIED.to_string();
    };

    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut previous: Option<char> = None;
    for c in raw.chars() {
        if c == '_' || c == '-' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() && previous.is_some_and(|p| p.is_lowercase()) {
                spaced.push(' ');
            }
            spaced.push(c);
        }
        previous = Some(c);
    }

    let lowered = spaced.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => EMPLOYMENT_TYPE_NOT_SPECIFIED.to_string(),
    }
}
