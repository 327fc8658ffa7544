use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Colors assigned to new groups, cycled by the number of existing groups.
pub const GROUP_PALETTE: [&str; 12] = [
    "#2dd4bf", "#60a5fa", "#c084fc", "#f87171", "#fbbf24", "#a3e635", "#f472b6", "#34d399",
    "#818cf8", "#fca5a5", "#fde047", "#4ade80",
];

pub fn palette_color(index: usize) -> &'static str {
    GROUP_PALETTE[index % GROUP_PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GroupKind {
    #[default]
    Normal,
    /// One concentration per distinct dose level, not per replicate.
    DoseResponse { concentrations: Vec<f64> },
}

impl GroupKind {
    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::Normal => "Normal",
            GroupKind::DoseResponse { .. } => "Dose-Response",
        }
    }

    pub fn concentrations(&self) -> &[f64] {
        match self {
            GroupKind::Normal => &[],
            GroupKind::DoseResponse { concentrations } => concentrations,
        }
    }

    pub fn is_dose_response(&self) -> bool {
        matches!(self, GroupKind::DoseResponse { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown group type '{0}'. Expected 'Normal' or 'Dose-Response'.")]
pub struct GroupKindError(pub String);

impl FromStr for GroupKind {
    type Err = GroupKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(GroupKind::Normal),
            "dose-response" | "dose_response" | "doseresponse" => Ok(GroupKind::DoseResponse {
                concentrations: Vec::new(),
            }),
            _ => Err(GroupKindError(s.to_string())),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A treatment or condition placed on one or more wells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GroupRecord", into = "GroupRecord")]
pub struct Group {
    pub name: String,
    pub color: String,
    pub kind: GroupKind,
}

impl Group {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            kind: GroupKind::Normal,
        }
    }

    pub fn with_kind(mut self, kind: GroupKind) -> Self {
        self.kind = kind;
        self
    }
}

// Flat session shape: `{ name, color, type, concentrations }`.
#[derive(Serialize, Deserialize)]
struct GroupRecord {
    name: String,
    #[serde(default)]
    color: String,
    #[serde(rename = "type", default = "normal_label")]
    kind: String,
    #[serde(default)]
    concentrations: Vec<f64>,
}

fn normal_label() -> String {
    GroupKind::Normal.label().to_string()
}

impl TryFrom<GroupRecord> for Group {
    type Error = GroupKindError;

    fn try_from(record: GroupRecord) -> Result<Self, Self::Error> {
        let kind = match record.kind.parse::<GroupKind>()? {
            GroupKind::Normal => GroupKind::Normal,
            GroupKind::DoseResponse { .. } => GroupKind::DoseResponse {
                concentrations: record.concentrations,
            },
        };
        Ok(Group {
            name: record.name,
            color: record.color,
            kind,
        })
    }
}

impl From<Group> for GroupRecord {
    fn from(group: Group) -> Self {
        let kind = group.kind.label().to_string();
        let concentrations = match group.kind {
            GroupKind::Normal => Vec::new(),
            GroupKind::DoseResponse { concentrations } => concentrations,
        };
        GroupRecord {
            name: group.name,
            color: group.color,
            kind,
            concentrations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_color_cycles_after_twelve_groups() {
        assert_eq!(palette_color(0), "#2dd4bf");
        assert_eq!(palette_color(12), palette_color(0));
        assert_eq!(palette_color(13), "#60a5fa");
    }

    #[test]
    fn group_kind_parses_session_labels() {
        assert_eq!("Normal".parse::<GroupKind>(), Ok(GroupKind::Normal));
        assert!("Dose-Response".parse::<GroupKind>().unwrap().is_dose_response());
        assert!("dose_response".parse::<GroupKind>().unwrap().is_dose_response());
        assert!("Titration".parse::<GroupKind>().is_err());
    }

    #[test]
    fn dose_response_group_round_trips_through_flat_json() {
        let group = Group::new("Drug A", "#60a5fa").with_kind(GroupKind::DoseResponse {
            concentrations: vec![100.0, 10.0, 1.0],
        });
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["type"], "Dose-Response");
        assert_eq!(json["concentrations"], serde_json::json!([100.0, 10.0, 1.0]));

        let parsed: Group = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, group);
    }

    #[test]
    fn normal_group_ignores_stray_concentrations() {
        let parsed: Group = serde_json::from_str(
            r##"{"name":"Blank","color":"#fff","type":"Normal","concentrations":[1,2]}"##,
        )
        .unwrap();
        assert_eq!(parsed.kind, GroupKind::Normal);
        assert!(parsed.kind.concentrations().is_empty());
    }

    #[test]
    fn unknown_group_type_is_rejected() {
        let result = serde_json::from_str::<Group>(r#"{"name":"X","type":"Weird"}"#);
        assert!(result.is_err());
    }
}
