use arrowmark_base::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Arrow, ArrowColor, Error, Result};

/// One arrow as written to a per-volume sidecar file.
///
/// `length` caches the norm of `direction`; `direction` is authoritative on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SidecarRecord {
    pub end: Vec3,
    pub direction: Vec3,
    #[serde(default)]
    pub edge_color: ArrowColor,
    #[serde(default = "default_edge_width")]
    pub edge_width: f64,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_edge_width() -> f64 {
    3.0
}

fn default_opacity() -> f64 {
    1.0
}

impl From<&Arrow> for SidecarRecord {
    fn from(arrow: &Arrow) -> Self {
        Self {
            end: arrow.end(),
            direction: arrow.direction(),
            edge_color: arrow.color().clone(),
            edge_width: arrow.edge_width(),
            length: Some(arrow.length()),
            opacity: arrow.opacity(),
        }
    }
}

impl TryFrom<SidecarRecord> for Arrow {
    type Error = Error;

    fn try_from(record: SidecarRecord) -> Result<Self> {
        Arrow::new(
            record.end,
            record.direction,
            record.edge_color,
            record.edge_width,
            record.opacity,
        )
    }
}

pub fn encode_sidecar(arrows: &[Arrow]) -> Result<Vec<u8>> {
    let records: Vec<SidecarRecord> = arrows.iter().map(SidecarRecord::from).collect();
    Ok(serde_json::to_vec_pretty(&records)?)
}

/// Parses a sidecar document. Any bad record fails the whole document.
pub fn decode_sidecar(bytes: &[u8]) -> Result<Vec<Arrow>> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|err| Error::CorruptFile(format!("not valid JSON: {err}")))?;
    let Value::Array(items) = document else {
        return Err(Error::CorruptFile(
            "expected a JSON array of arrow records".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(row, item)| {
            let record: SidecarRecord = serde_json::from_value(item)
                .map_err(|err| Error::CorruptFile(format!("record {row}: {err}")))?;
            Arrow::try_from(record)
                .map_err(|err| Error::CorruptFile(format!("record {row}: {err}")))
        })
        .collect()
}
