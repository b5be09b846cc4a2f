use serde::{Deserialize, Serialize};

use crate::config::CleanerConfig;

/// Logical role a column plays, inferred from its header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Temporal,
    Pollutant,
    QualityIndex,
    QualityCategory,
    City,
}

impl ColumnRole {
    /// Header names accepted for this role, in priority order.
    pub fn aliases<'a>(&self, config: &'a CleanerConfig) -> Vec<&'a str> {
        match self {
            ColumnRole::Temporal => config.temporal_aliases.iter().map(String::as_str).collect(),
            ColumnRole::Pollutant => config.pollutants.iter().map(String::as_str).collect(),
            ColumnRole::QualityIndex => vec![config.quality_index.as_str()],
            ColumnRole::QualityCategory => vec![config.quality_category.as_str()],
            ColumnRole::City => vec![config.city_column.as_str()],
        }
    }

    /// Whether every present alias is used, or only the first match.
    fn is_multi_column(&self) -> bool {
        matches!(self, ColumnRole::Pollutant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    pub name: String,
    pub index: usize,
}

/// Role-to-column assignment for one dataset, resolved once from its headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub temporal: Option<ResolvedColumn>,
    pub pollutants: Vec<ResolvedColumn>,
    pub quality_index: Option<ResolvedColumn>,
    pub quality_category: Option<ResolvedColumn>,
    pub city: Option<ResolvedColumn>,
}

impl ColumnRoles {
    pub fn resolve(headers: &[String], config: &CleanerConfig) -> Self {
        let first = |role: ColumnRole| resolve_role(headers, config, role).into_iter().next();

        Self {
            temporal: first(ColumnRole::Temporal),
            pollutants: resolve_role(headers, config, ColumnRole::Pollutant),
            quality_index: first(ColumnRole::QualityIndex),
            quality_category: first(ColumnRole::QualityCategory),
            city: first(ColumnRole::City),
        }
    }

    pub fn pollutant(&self, name: &str) -> Option<&ResolvedColumn> {
        self.pollutants.iter().find(|c| c.name == name)
    }
}

fn resolve_role(headers: &[String], config: &CleanerConfig, role: ColumnRole) -> Vec<ResolvedColumn> {
    let mut resolved = Vec::new();

    for alias in role.aliases(config) {
        if let Some(index) = headers.iter().position(|h| h == alias) {
            resolved.push(ResolvedColumn {
                name: alias.to_string(),
                index,
            });
            if !role.is_multi_column() {
                break;
            }
        }
    }

    resolved
}
