//! Statische afhankelijkheidstabellen van het landmarkstelsel.
//!
//! De tabellen liggen vast voor de levensduur van het proces en worden na
//! initialisatie nooit gemuteerd: welke segmenten bij welk punt horen
//! (`connections`), welk punt kind is van welk segment (`parent_of`), op
//! welk segment een punt vastgeplakt wordt (`glue_target`) en in welke
//! volgorde de parameterregels geëvalueerd worden (`RULES`).

use crate::measure::Param;
use crate::scene::{Mark, SegmentKey};

/// Vaste plaatsingsvolgorde van de door de gebruiker te zetten punten; de
/// "volgende punt"-hint in het plaatsingsresultaat volgt deze lijst.
pub const PLACEMENT_ORDER: [Mark; 13] = [
    Mark::Y,
    Mark::X,
    Mark::Z,
    Mark::F,
    Mark::H,
    Mark::B,
    Mark::G,
    Mark::A,
    Mark::D,
    Mark::E,
    Mark::L,
    Mark::M,
    Mark::N,
];

/// Referentieposities van de punten op het voorbeeldschema, voor een
/// front-end die het schema naast de scan toont.
pub const SCHEME: [(Mark, (f64, f64)); 13] = [
    (Mark::Y, (171.0, 502.0)),
    (Mark::X, (136.0, 25.0)),
    (Mark::Z, (189.0, 21.0)),
    (Mark::F, (84.0, 425.0)),
    (Mark::H, (22.0, 195.0)),
    (Mark::B, (235.0, 433.0)),
    (Mark::G, (246.0, 148.0)),
    (Mark::A, (141.0, 86.0)),
    (Mark::D, (49.0, 296.0)),
    (Mark::E, (127.0, 295.0)),
    (Mark::L, (232.0, 66.0)),
    (Mark::M, (27.0, 131.0)),
    (Mark::N, (139.0, 207.0)),
];

pub const XY: SegmentKey = SegmentKey::new(Mark::X, Mark::Y);
pub const YZ: SegmentKey = SegmentKey::new(Mark::Y, Mark::Z);
pub const WY: SegmentKey = SegmentKey::new(Mark::W, Mark::Y);
pub const WZ: SegmentKey = SegmentKey::new(Mark::W, Mark::Z);
pub const BG: SegmentKey = SegmentKey::new(Mark::B, Mark::G);
pub const FH: SegmentKey = SegmentKey::new(Mark::F, Mark::H);
pub const GH: SegmentKey = SegmentKey::new(Mark::G, Mark::H);
pub const BF: SegmentKey = SegmentKey::new(Mark::B, Mark::F);
pub const GL: SegmentKey = SegmentKey::new(Mark::G, Mark::L);
pub const HM: SegmentKey = SegmentKey::new(Mark::H, Mark::M);
pub const GN: SegmentKey = SegmentKey::new(Mark::G, Mark::N);
pub const IK: SegmentKey = SegmentKey::new(Mark::I, Mark::K);

/// Symmetrische adjacentie: met welke punten dit punt door een segment
/// verbonden wordt zodra beide bestaan.
#[must_use]
pub const fn connections(mark: Mark) -> &'static [Mark] {
    match mark {
        Mark::Y => &[Mark::X, Mark::Z, Mark::W],
        Mark::X => &[Mark::Y],
        Mark::Z => &[Mark::Y, Mark::W],
        Mark::F => &[Mark::H, Mark::B],
        Mark::H => &[Mark::G, Mark::M, Mark::F],
        Mark::B => &[Mark::G, Mark::F],
        Mark::G => &[Mark::B, Mark::H, Mark::L, Mark::N],
        Mark::L => &[Mark::G],
        Mark::M => &[Mark::H],
        Mark::N => &[Mark::G],
        Mark::W => &[Mark::Z, Mark::Y],
        Mark::K => &[Mark::I],
        Mark::I => &[Mark::K],
        Mark::A | Mark::D | Mark::E | Mark::C => &[],
    }
}

/// Segment waar dit punt kind van is (voor cascadeverwijdering).
#[must_use]
pub const fn parent_of(mark: Mark) -> Option<SegmentKey> {
    match mark {
        Mark::A | Mark::C | Mark::W => Some(XY),
        Mark::D | Mark::E => Some(IK),
        Mark::I => Some(BG),
        Mark::K => Some(FH),
        _ => None,
    }
}

/// Segment waarop dit punt bij plaatsing vastgeplakt wordt, als dat
/// segment bestaat.
#[must_use]
pub const fn glue_target(mark: Mark) -> Option<SegmentKey> {
    match mark {
        Mark::A => Some(XY),
        Mark::D | Mark::E => Some(IK),
        _ => None,
    }
}

/// Wat een parameterregel doet wanneer hij vuurt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Berekent een klinische maat.
    Compute(Param),
    /// Synthetiseert punt C (midden van A en Y).
    PlotC,
    /// Ruimt I, K en segment IK op wanneer een van X, A of Y verandert.
    InvalidateIk,
    /// Synthetiseert punt I (loodlijn uit C op XY, gesneden met BG).
    PlotI,
    /// Synthetiseert punt K (loodlijn uit C op XY, gesneden met FH).
    PlotK,
    /// Bouwt segment IK zodra I en K beide bestaan.
    LinkIk,
}

/// Eén regel uit de parametertabel: vuurt wanneer het gewijzigde punt in de
/// triggerverzameling zit en alle vereisten aanwezig zijn.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub action: Action,
    /// Punten waarvan een wijziging deze regel opnieuw evalueert.
    pub triggers: &'static [Mark],
    /// Punten die moeten bestaan voordat de berekening geldig is.
    pub requires_points: &'static [Mark],
    /// Segmenten die moeten bestaan voordat de berekening geldig is.
    pub requires_segments: &'static [SegmentKey],
}

/// De parametertabel, in vaste evaluatievolgorde. De volgorde is
/// betekenisdragend: afgeleide punten worden gezet voordat de maten die
/// ervan afhangen aan de beurt komen, en de invalidatie van I/K/IK komt
/// vóór hun hersynthese.
pub const RULES: [Rule; 14] = [
    Rule {
        action: Action::Compute(Param::Length),
        triggers: &[Mark::Y, Mark::X, Mark::Z],
        requires_points: &[Mark::X, Mark::Y, Mark::Z],
        requires_segments: &[XY, YZ],
    },
    Rule {
        action: Action::PlotC,
        triggers: &[Mark::Y, Mark::A],
        requires_points: &[Mark::A, Mark::Y],
        requires_segments: &[],
    },
    Rule {
        action: Action::InvalidateIk,
        triggers: &[Mark::X, Mark::A, Mark::Y],
        requires_points: &[],
        requires_segments: &[IK],
    },
    Rule {
        action: Action::PlotI,
        triggers: &[Mark::Y, Mark::A, Mark::B, Mark::G],
        requires_points: &[Mark::C, Mark::B, Mark::G],
        requires_segments: &[BG, XY],
    },
    Rule {
        action: Action::PlotK,
        triggers: &[Mark::Y, Mark::A, Mark::F, Mark::H],
        requires_points: &[Mark::C, Mark::F, Mark::H],
        requires_segments: &[FH, XY],
    },
    Rule {
        action: Action::LinkIk,
        triggers: &[Mark::Y, Mark::A, Mark::F, Mark::H, Mark::B, Mark::G],
        requires_points: &[Mark::I, Mark::K],
        requires_segments: &[],
    },
    Rule {
        action: Action::Compute(Param::WidthFoot),
        triggers: &[Mark::H, Mark::G],
        requires_points: &[Mark::G, Mark::H],
        requires_segments: &[GH],
    },
    Rule {
        action: Action::Compute(Param::WidthHeel),
        triggers: &[Mark::B, Mark::F],
        requires_points: &[Mark::B, Mark::F],
        requires_segments: &[BF],
    },
    Rule {
        action: Action::Compute(Param::Alpha),
        triggers: &[Mark::B, Mark::G, Mark::L],
        requires_points: &[Mark::B, Mark::G, Mark::L],
        requires_segments: &[BG, GL],
    },
    Rule {
        action: Action::Compute(Param::Beta),
        triggers: &[Mark::H, Mark::M, Mark::F],
        requires_points: &[Mark::F, Mark::H, Mark::M],
        requires_segments: &[HM, FH],
    },
    Rule {
        action: Action::Compute(Param::Gamma),
        triggers: &[Mark::B, Mark::G, Mark::F, Mark::H],
        requires_points: &[Mark::B, Mark::G, Mark::F, Mark::H],
        requires_segments: &[BG, FH],
    },
    Rule {
        action: Action::Compute(Param::Clark),
        triggers: &[Mark::G, Mark::N, Mark::B],
        requires_points: &[Mark::B, Mark::G, Mark::N],
        requires_segments: &[GN],
    },
    // De triggerverzameling van w is de unie van die van length en
    // width_foot: w leest twee berekende parameters, geen ruwe punten.
    Rule {
        action: Action::Compute(Param::W),
        triggers: &[Mark::Y, Mark::X, Mark::Z, Mark::H, Mark::G],
        requires_points: &[Mark::X, Mark::Y, Mark::Z, Mark::G, Mark::H],
        requires_segments: &[],
    },
    Rule {
        action: Action::Compute(Param::Chijin),
        triggers: &[Mark::D, Mark::E],
        requires_points: &[Mark::D, Mark::E, Mark::I],
        requires_segments: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::{Action, PLACEMENT_ORDER, RULES, connections, glue_target, parent_of};
    use crate::scene::Mark;

    #[test]
    fn connections_are_symmetric() {
        for mark in Mark::ALL {
            for &neighbour in connections(mark) {
                assert!(
                    connections(neighbour).contains(&mark),
                    "verbinding {mark}-{neighbour} is niet symmetrisch"
                );
            }
        }
    }

    #[test]
    fn placement_order_contains_no_derived_marks() {
        for mark in PLACEMENT_ORDER {
            assert!(!mark.is_derived(), "{mark} hoort niet in de plaatsingslijst");
        }
    }

    #[test]
    fn derived_marks_have_parents() {
        for mark in Mark::ALL {
            if mark.is_derived() {
                assert!(parent_of(mark).is_some(), "{mark} mist een parent");
            }
        }
    }

    #[test]
    fn glue_targets_match_parents() {
        for mark in Mark::ALL {
            if let Some(target) = glue_target(mark) {
                assert_eq!(parent_of(mark), Some(target));
            }
        }
    }

    #[test]
    fn rules_never_trigger_on_derived_marks() {
        // De engine voert de parameterfase alleen voor geplaatste punten
        // uit; een trigger op een afgeleid punt zou nooit vuren.
        for rule in RULES {
            for &mark in rule.triggers {
                assert!(!mark.is_derived(), "regel {:?} triggert op {mark}", rule.action);
            }
        }
    }

    #[test]
    fn synthesis_precedes_dependent_rules() {
        let position = |action: Action| {
            RULES
                .iter()
                .position(|rule| rule.action == action)
                .expect("regel aanwezig")
        };
        assert!(position(Action::PlotC) < position(Action::PlotI));
        assert!(position(Action::PlotC) < position(Action::PlotK));
        assert!(position(Action::InvalidateIk) < position(Action::PlotI));
        assert!(position(Action::PlotI) < position(Action::LinkIk));
        assert!(position(Action::PlotK) < position(Action::LinkIk));
    }
}
