//! Snapshot-uitwisseling: de platte toestandsweergave die de
//! persistentielaag serialiseert, plus de gevalideerde terugweg.
//!
//! Een snapshot is bewust dom: namen en getallen, geen engine-typen. De
//! import valideert eerst het volledige snapshot en bouwt pas daarna een
//! engine; een afgekeurd snapshot laat dus nooit een half geladen
//! toestand achter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Engine;
use crate::geom::{Line2, Point2};
use crate::measure::{Param, Parameters};
use crate::registry::{self, Action};
use crate::scene::{Landmark, Mark, Scene, Segment, SegmentKey};

/// Sleutel waaronder de kalibratie tussen de parameters meereist.
pub const DPMM_KEY: &str = "dpmm";

/// Platte toestandsweergave: punten op naam, segmenten als canonieke
/// sleutels, parameters op naam met `dpmm` als extra invoer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub points: BTreeMap<String, (f64, f64)>,
    pub lines: Vec<String>,
    pub parameters: BTreeMap<String, f64>,
}

/// Afkeurredenen bij het laden van een snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("onbekend punt `{0}` in snapshot")]
    UnknownPoint(String),
    #[error("lijnsleutel `{0}` is niet canoniek (twee bekende letters, alfabetisch)")]
    MalformedKey(String),
    #[error("lijn `{key}` verwijst naar ontbrekend punt {mark}")]
    MissingEndpoint { key: String, mark: Mark },
    #[error("onbekende parameter `{0}` in snapshot")]
    UnknownParameter(String),
    #[error("parameter `{parameter}` aanwezig zonder vereiste `{missing}`")]
    MissingRequirement {
        parameter: &'static str,
        missing: String,
    },
    #[error("kalibratiewaarde dpmm ontbreekt of is ongeldig")]
    InvalidDpmm,
}

impl Engine {
    /// Exporteert de volledige huidige toestand, inclusief afgeleide
    /// punten en de kalibratie.
    #[must_use]
    pub fn export_state(&self) -> Snapshot {
        let points = self
            .scene()
            .points()
            .map(|landmark| {
                (
                    landmark.mark.to_string(),
                    (landmark.position.x, landmark.position.y),
                )
            })
            .collect();
        let lines = self.scene().segment_keys().map(|key| key.to_string()).collect();
        let mut parameters: BTreeMap<String, f64> = self
            .parameters()
            .iter()
            .map(|(param, value)| (param.name().to_owned(), value))
            .collect();
        parameters.insert(DPMM_KEY.to_owned(), self.dpmm());

        Snapshot {
            points,
            lines,
            parameters,
        }
    }

    /// Valideert het snapshot en bouwt er een verse engine uit.
    pub fn import_state(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        let mut marks: BTreeMap<Mark, Point2> = BTreeMap::new();
        for (name, &(x, y)) in &snapshot.points {
            let mark: Mark = name
                .parse()
                .map_err(|_| SnapshotError::UnknownPoint(name.clone()))?;
            marks.insert(mark, Point2::new(x, y));
        }

        let mut keys = Vec::with_capacity(snapshot.lines.len());
        for line in &snapshot.lines {
            let key: SegmentKey = line
                .parse()
                .map_err(|_| SnapshotError::MalformedKey(line.clone()))?;
            for mark in [key.first(), key.second()] {
                if !marks.contains_key(&mark) {
                    return Err(SnapshotError::MissingEndpoint {
                        key: line.clone(),
                        mark,
                    });
                }
            }
            keys.push(key);
        }

        let dpmm = snapshot
            .parameters
            .get(DPMM_KEY)
            .copied()
            .ok_or(SnapshotError::InvalidDpmm)?;
        if !dpmm.is_finite() || dpmm <= 0.0 {
            return Err(SnapshotError::InvalidDpmm);
        }

        let mut parameters = Parameters::new();
        for (name, &value) in &snapshot.parameters {
            if name == DPMM_KEY {
                continue;
            }
            let param: Param = name
                .parse()
                .map_err(|_| SnapshotError::UnknownParameter(name.clone()))?;
            parameters.set(param, value);
        }

        // Elke aanwezige parameter moet zijn vereisten in het snapshot
        // zelf terugvinden; anders zou de rusttoestand-invariant al bij
        // het laden geschonden zijn.
        for rule in &registry::RULES {
            let Action::Compute(param) = rule.action else {
                continue;
            };
            if !parameters.contains(param) {
                continue;
            }
            for &mark in rule.requires_points {
                if !marks.contains_key(&mark) {
                    return Err(SnapshotError::MissingRequirement {
                        parameter: param.name(),
                        missing: mark.to_string(),
                    });
                }
            }
            for &key in rule.requires_segments {
                if !keys.contains(&key) {
                    return Err(SnapshotError::MissingRequirement {
                        parameter: param.name(),
                        missing: key.to_string(),
                    });
                }
            }
        }

        // Pas na volledige validatie wordt er iets opgebouwd.
        let mut scene = Scene::new();
        for (&mark, &position) in &marks {
            let mut landmark = Landmark::new(mark, position);
            landmark.attachment =
                registry::parent_of(mark).filter(|parent| keys.contains(parent));
            scene.upsert(landmark);
        }
        for key in keys {
            scene.upsert_segment(Segment {
                key,
                line: Line2::new(marks[&key.first()], marks[&key.second()]),
            });
        }

        Ok(Self::from_parts(scene, parameters, dpmm))
    }
}
