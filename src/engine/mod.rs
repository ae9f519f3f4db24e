//! Propagatie-engine: verwerkt precies één gebruikersactie per aanroep.
//!
//! Eén aanroep doorloopt de vaste fasen Placing → Gluing → LineUpdate →
//! ParameterUpdate en keert daarna terug naar rust. De engine itereert
//! nooit naar een fixpunt; afgeleide punten mogen de lijnfase precies één
//! keer opnieuw binnengaan via hun eigen naam, en de afhankelijkheids-
//! tabellen zijn acyclisch, dus die recursie is begrensd.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::geom::{Line2, Point2, perpendicular_foot, perpendicular_through};
use crate::measure::{self, Param, Parameters};
use crate::registry::{self, Action};
use crate::scene::{Landmark, Mark, Removals, Scene, Segment, SegmentKey};

/// Fouttype voor de propagatie-engine.
///
/// `MissingPrerequisite` duidt altijd op een programmeerfout in de engine
/// zelf: de trigger- en vereistencontroles horen dit onmogelijk te maken.
/// Herstelbare meetkundige ontaardingen zijn géén fouten; die komen als
/// [`Degeneracy`] in het plaatsingsresultaat terug.
#[derive(Debug, Error)]
pub enum EngineError {
    /// De dpmm-kalibratie is niet bruikbaar.
    #[error("kalibratiewaarde dpmm {0} is ongeldig; verwacht een eindig, positief getal")]
    InvalidCalibration(f64),
    /// Het punt wordt door de engine afgeleid en mag niet direct geplaatst
    /// worden.
    #[error("punt {0} wordt door de engine afgeleid en kan niet direct geplaatst worden")]
    NotPlaceable(Mark),
    /// Een berekening werd gestart terwijl een vereiste ontbrak.
    #[error("ontbrekende voorwaarde in de propagatie: {0}")]
    MissingPrerequisite(String),
}

/// Meetkundige ontaarding die lokaal hersteld is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Degeneracy {
    /// Vastplakken vond geen snijpunt; de ruwe positie is gebruikt.
    Glue(Mark),
    /// De loodlijn uit Z op XY vond geen snijpunt; de ruwe XY-lengte is
    /// gebruikt.
    FootLength,
    /// Synthese van een afgeleid punt vond geen snijpunt; het punt is
    /// overgeslagen.
    Synthesis(Mark),
    /// De noemer van een verhouding was nul; de parameter is overgeslagen.
    ZeroDenominator(Param),
}

/// Resultaat van één plaatsingsactie: wat er dit keer veranderd is, plus de
/// hint welk punt de gebruiker als volgende hoort te zetten.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlacementDelta {
    /// Parameters die deze aanroep een (nieuwe) waarde kregen.
    pub parameters: BTreeMap<Param, f64>,
    /// Parameters die vervielen doordat hun vereisten verdwenen.
    pub parameters_removed: Vec<Param>,
    pub points_added: Vec<Mark>,
    pub points_removed: Vec<Mark>,
    pub segments_added: Vec<SegmentKey>,
    pub segments_removed: Vec<SegmentKey>,
    /// Lokaal herstelde ontaardingen, voor de loglaag van de aanroeper.
    pub degeneracies: Vec<Degeneracy>,
    /// Eerste nog niet geplaatste punt uit de vaste plaatsingsvolgorde.
    pub next_expected: Option<Mark>,
}

/// De rekenkern: bezit de scene en de parameterverzameling exclusief voor
/// de duur van een actie en geeft ze tussen acties alleen-lezen terug aan
/// de weergavelaag.
#[derive(Debug, Clone)]
pub struct Engine {
    scene: Scene,
    parameters: Parameters,
    dpmm: f64,
}

impl Engine {
    /// Maakt een lege engine met de opgegeven kalibratie (dots per mm).
    pub fn new(dpmm: f64) -> Result<Self, EngineError> {
        if !dpmm.is_finite() || dpmm <= 0.0 {
            return Err(EngineError::InvalidCalibration(dpmm));
        }
        Ok(Self {
            scene: Scene::new(),
            parameters: Parameters::new(),
            dpmm,
        })
    }

    /// Bouwt een engine uit al gevalideerde onderdelen (snapshot-import).
    pub(crate) fn from_parts(scene: Scene, parameters: Parameters, dpmm: f64) -> Self {
        Self {
            scene,
            parameters,
            dpmm,
        }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn dpmm(&self) -> f64 {
        self.dpmm
    }

    /// Eerste nog niet geplaatste punt uit de vaste plaatsingsvolgorde.
    #[must_use]
    pub fn next_expected(&self) -> Option<Mark> {
        registry::PLACEMENT_ORDER
            .into_iter()
            .find(|&mark| !self.scene.contains(mark))
    }

    /// Het enige ingangspunt: plaatst of verplaatst een punt en propageert
    /// de gevolgen in één vaste doorloop.
    pub fn place_or_move(
        &mut self,
        mark: Mark,
        x: f64,
        y: f64,
    ) -> Result<PlacementDelta, EngineError> {
        if mark.is_derived() {
            return Err(EngineError::NotPlaceable(mark));
        }

        let mut delta = PlacementDelta::default();
        let raw = Point2::new(x, y);
        let (position, attachment) = self.glue(mark, raw, &mut delta);
        log::debug!(
            "punt {mark} geplaatst op ({:.2}, {:.2})",
            position.x,
            position.y
        );

        let mut landmark = Landmark::new(mark, position);
        landmark.attachment = attachment;
        self.scene.upsert(landmark);
        push_unique(&mut delta.points_added, mark);

        self.update_lines(mark, &mut delta)?;
        self.update_parameters(mark, &mut delta)?;
        self.prune_parameters(&mut delta);

        delta.next_expected = self.next_expected();
        Ok(delta)
    }

    /// Gluing-fase: projecteert de ruwe positie loodrecht op het
    /// doelsegment wanneer dat bestaat. Zonder snijpunt (parallel of
    /// ontaard) blijft de ruwe positie staan.
    fn glue(
        &self,
        mark: Mark,
        raw: Point2,
        delta: &mut PlacementDelta,
    ) -> (Point2, Option<SegmentKey>) {
        let Some(target) = registry::glue_target(mark) else {
            return (raw, None);
        };
        let Some(segment) = self.scene.segment(target) else {
            return (raw, None);
        };
        match perpendicular_foot(raw, segment.line) {
            Some(foot) => (foot, Some(target)),
            None => {
                log::warn!("kon {mark} niet op {target} vastplakken; ruwe positie gebruikt");
                delta.degeneracies.push(Degeneracy::Glue(mark));
                (raw, Some(target))
            }
        }
    }

    /// LineUpdate-fase: herbouwt elk segment naar een bestaande buur vanaf
    /// de huidige eindpuntposities (vervang-indien-aanwezig).
    fn update_lines(&mut self, mark: Mark, delta: &mut PlacementDelta) -> Result<(), EngineError> {
        for &neighbour in registry::connections(mark) {
            if self.scene.contains(neighbour) {
                self.rebuild_segment(SegmentKey::new(mark, neighbour), delta)?;
            }
        }
        Ok(())
    }

    fn rebuild_segment(
        &mut self,
        key: SegmentKey,
        delta: &mut PlacementDelta,
    ) -> Result<(), EngineError> {
        let p1 = self.point_position(key.first())?;
        let p2 = self.point_position(key.second())?;
        self.scene.upsert_segment(Segment {
            key,
            line: Line2::new(p1, p2),
        });
        push_unique(&mut delta.segments_added, key);
        Ok(())
    }

    /// ParameterUpdate-fase: loopt de regeltabel in vaste volgorde af en
    /// voert elke regel uit waarvan de trigger raak is en de vereisten
    /// aanwezig zijn.
    fn update_parameters(
        &mut self,
        updated: Mark,
        delta: &mut PlacementDelta,
    ) -> Result<(), EngineError> {
        for rule in &registry::RULES {
            if !rule.triggers.contains(&updated) || !self.requirements_met(rule) {
                continue;
            }
            match rule.action {
                Action::Compute(param) => self.compute(param, delta)?,
                Action::PlotC => self.plot_c(delta)?,
                Action::InvalidateIk => self.invalidate_ik(delta),
                Action::PlotI => self.plot_intersection(Mark::I, registry::BG, delta)?,
                Action::PlotK => self.plot_intersection(Mark::K, registry::FH, delta)?,
                Action::LinkIk => self.rebuild_segment(registry::IK, delta)?,
            }
        }
        Ok(())
    }

    fn requirements_met(&self, rule: &registry::Rule) -> bool {
        rule.requires_points
            .iter()
            .all(|&mark| self.scene.contains(mark))
            && rule
                .requires_segments
                .iter()
                .all(|&key| self.scene.contains_segment(key))
    }

    fn compute(&mut self, param: Param, delta: &mut PlacementDelta) -> Result<(), EngineError> {
        let value = match param {
            Param::Length => self.foot_length(delta)?,
            Param::WidthFoot => {
                measure::to_millimeters(self.segment_line(registry::GH)?.length(), self.dpmm)
            }
            Param::WidthHeel => {
                measure::to_millimeters(self.segment_line(registry::BF)?.length(), self.dpmm)
            }
            Param::Alpha => measure::angle_between(
                self.segment_line(registry::BG)?,
                self.segment_line(registry::GL)?,
            ),
            Param::Beta => measure::angle_between(
                self.segment_line(registry::HM)?,
                self.segment_line(registry::FH)?,
            ),
            Param::Gamma => measure::angle_between(
                self.segment_line(registry::BG)?,
                self.segment_line(registry::FH)?,
            ),
            Param::Clark => {
                // Verse lijn G-B: G en B zijn in de adjacentie niet direct
                // verbonden, dus er bestaat geen opgeslagen segment voor.
                let gn = self.segment_line(registry::GN)?;
                let g = self.point_position(Mark::G)?;
                let b = self.point_position(Mark::B)?;
                measure::angle_between(gn, Line2::new(g, b))
            }
            Param::Chijin => {
                let d = self.point_position(Mark::D)?;
                let e = self.point_position(Mark::E)?;
                let i = self.point_position(Mark::I)?;
                let denominator = e.distance_to(i);
                if denominator == 0.0 {
                    log::warn!("afstand E-I is nul; chijin overgeslagen");
                    delta.degeneracies.push(Degeneracy::ZeroDenominator(param));
                    return Ok(());
                }
                d.distance_to(e) / denominator
            }
            Param::W => {
                // Tweede-orde afhankelijkheid: leest twee eerder berekende
                // parameters in plaats van ruwe punten.
                let length = self.parameter_value(Param::Length)?;
                let width = self.parameter_value(Param::WidthFoot)?;
                if width == 0.0 {
                    log::warn!("voetbreedte is nul; w overgeslagen");
                    delta.degeneracies.push(Degeneracy::ZeroDenominator(param));
                    return Ok(());
                }
                length / width
            }
        };
        self.set_parameter(param, value, delta);
        Ok(())
    }

    /// Voetlengte in mm. XY geldt als lengte zodra XY minstens zo lang is
    /// als YZ; anders wordt W gesynthetiseerd als loodvoet van Z op XY en
    /// telt WY. De W-administratie (punt en segmenten WY/WZ) wordt hier in
    /// beide richtingen bijgehouden.
    fn foot_length(&mut self, delta: &mut PlacementDelta) -> Result<f64, EngineError> {
        let xy = self.segment_line(registry::XY)?;
        let yz = self.segment_line(registry::YZ)?;

        let pixels = if xy.length() >= yz.length() {
            if self.scene.contains(Mark::W) {
                log::debug!("XY is weer het langst; W en bijbehorende segmenten verwijderd");
                let mut removed = Removals::default();
                self.scene.remove_point_cascade(Mark::W, &mut removed);
                merge_removals(removed, delta);
            }
            xy.length()
        } else {
            let z = self.point_position(Mark::Z)?;
            match perpendicular_foot(z, xy) {
                Some(foot) => {
                    self.synthesize(Mark::W, foot, delta)?;
                    self.segment_line(registry::WY)?.length()
                }
                None => {
                    log::warn!("loodlijn uit Z op XY heeft geen snijpunt; XY-lengte gebruikt");
                    delta.degeneracies.push(Degeneracy::FootLength);
                    xy.length()
                }
            }
        };

        Ok(measure::to_millimeters(pixels, self.dpmm))
    }

    fn plot_c(&mut self, delta: &mut PlacementDelta) -> Result<(), EngineError> {
        let a = self.point_position(Mark::A)?;
        let y = self.point_position(Mark::Y)?;
        self.synthesize(Mark::C, a.midpoint(y), delta)
    }

    /// Synthese van I of K: de loodlijn uit C op XY, gesneden met het
    /// dragende segment (oneindig doorgetrokken).
    fn plot_intersection(
        &mut self,
        mark: Mark,
        carrier: SegmentKey,
        delta: &mut PlacementDelta,
    ) -> Result<(), EngineError> {
        let c = self.point_position(Mark::C)?;
        let xy = self.segment_line(registry::XY)?;
        let probe = perpendicular_through(c, xy);
        match self.segment_line(carrier)?.intersection(probe) {
            Some(position) => self.synthesize(mark, position, delta),
            None => {
                log::warn!("geen snijpunt voor {mark} op {carrier}; punt overgeslagen");
                delta.degeneracies.push(Degeneracy::Synthesis(mark));
                Ok(())
            }
        }
    }

    /// Zet een afgeleid punt neer (vervang-indien-aanwezig) en laat het
    /// via zijn eigen naam de lijnfase precies één keer opnieuw doorlopen.
    fn synthesize(
        &mut self,
        mark: Mark,
        position: Point2,
        delta: &mut PlacementDelta,
    ) -> Result<(), EngineError> {
        let mut landmark = Landmark::new(mark, position);
        landmark.attachment = registry::parent_of(mark);
        self.scene.upsert(landmark);
        push_unique(&mut delta.points_added, mark);
        self.update_lines(mark, delta)
    }

    /// Volledige afbraak van I, K en segment IK (met aangehechte kinderen);
    /// gedeeltelijke herberekening wordt niet geprobeerd. De punten worden
    /// vers gesynthetiseerd zodra een latere regel daar aanleiding toe
    /// geeft.
    fn invalidate_ik(&mut self, delta: &mut PlacementDelta) {
        log::debug!("X, A of Y gewijzigd; I, K en IK worden afgebroken");
        let mut removed = Removals::default();
        self.scene.remove_segment_cascade(registry::IK, &mut removed);
        self.scene.remove_point_cascade(Mark::I, &mut removed);
        self.scene.remove_point_cascade(Mark::K, &mut removed);
        merge_removals(removed, delta);
    }

    /// Laat parameters vervallen waarvan de vereisten niet langer bestaan,
    /// zodat de rusttoestand-invariant blijft gelden.
    fn prune_parameters(&mut self, delta: &mut PlacementDelta) {
        for rule in &registry::RULES {
            let Action::Compute(param) = rule.action else {
                continue;
            };
            if self.parameters.contains(param) && !self.requirements_met(rule) {
                self.parameters.remove(param);
                delta.parameters.remove(&param);
                push_unique(&mut delta.parameters_removed, param);
                log::debug!("parameter {param} vervallen; vereisten verdwenen");
            }
        }
    }

    fn set_parameter(&mut self, param: Param, value: f64, delta: &mut PlacementDelta) {
        if self.parameters.set(param, value) {
            delta.parameters.insert(param, value);
        }
    }

    fn point_position(&self, mark: Mark) -> Result<Point2, EngineError> {
        self.scene
            .position(mark)
            .ok_or_else(|| EngineError::MissingPrerequisite(format!("punt {mark} ontbreekt")))
    }

    fn segment_line(&self, key: SegmentKey) -> Result<Line2, EngineError> {
        self.scene
            .segment(key)
            .map(|segment| segment.line)
            .ok_or_else(|| EngineError::MissingPrerequisite(format!("segment {key} ontbreekt")))
    }

    fn parameter_value(&self, param: Param) -> Result<f64, EngineError> {
        self.parameters
            .get(param)
            .ok_or_else(|| EngineError::MissingPrerequisite(format!("parameter {param} ontbreekt")))
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Verwerkt cascaderesultaten in de delta; wat binnen dezelfde actie eerst
/// toegevoegd en daarna verwijderd werd, telt netto als verwijderd.
fn merge_removals(removed: Removals, delta: &mut PlacementDelta) {
    for mark in removed.points {
        delta.points_added.retain(|&existing| existing != mark);
        push_unique(&mut delta.points_removed, mark);
    }
    for key in removed.segments {
        delta.segments_added.retain(|&existing| existing != key);
        push_unique(&mut delta.segments_removed, key);
    }
}

#[cfg(test)]
mod tests {
    use super::{Degeneracy, Engine, EngineError};
    use crate::geom::Point2;
    use crate::measure::Param;
    use crate::registry;
    use crate::scene::{Landmark, Mark};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rejects_invalid_calibration() {
        assert!(matches!(
            Engine::new(0.0),
            Err(EngineError::InvalidCalibration(_))
        ));
        assert!(matches!(
            Engine::new(f64::NAN),
            Err(EngineError::InvalidCalibration(_))
        ));
        assert!(Engine::new(5.0).is_ok());
    }

    #[test]
    fn derived_marks_cannot_be_placed_directly() {
        let mut engine = Engine::new(5.0).unwrap();
        for mark in [Mark::C, Mark::I, Mark::K, Mark::W] {
            assert!(matches!(
                engine.place_or_move(mark, 1.0, 1.0),
                Err(EngineError::NotPlaceable(m)) if m == mark
            ));
        }
    }

    #[test]
    fn placing_neighbours_builds_canonical_segments() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 0.0, 10.0).unwrap();
        let delta = engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        assert_eq!(delta.segments_added, vec![registry::XY]);
        assert_eq!(registry::XY.to_string(), "XY");
        assert!(engine.scene().contains_segment(registry::XY));
    }

    #[test]
    fn glues_a_onto_segment_xy() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 0.0, 10.0).unwrap();
        engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        engine.place_or_move(Mark::A, 3.0, 4.0).unwrap();

        let a = engine.scene().point(Mark::A).expect("A aanwezig");
        assert!(close(a.position.x, 0.0));
        assert!(close(a.position.y, 4.0));
        assert_eq!(a.attachment, Some(registry::XY));
    }

    #[test]
    fn gluing_without_target_keeps_raw_position() {
        let mut engine = Engine::new(5.0).unwrap();
        // Geen XY: A blijft op de ruwe klikpositie staan.
        let delta = engine.place_or_move(Mark::A, 3.0, 4.0).unwrap();
        let a = engine.scene().point(Mark::A).unwrap();
        assert_eq!(a.position, Point2::new(3.0, 4.0));
        assert_eq!(a.attachment, None);
        assert!(delta.degeneracies.is_empty());
    }

    #[test]
    fn gluing_onto_a_zero_length_segment_keeps_raw_position() {
        let mut engine = Engine::new(5.0).unwrap();
        // X en Y op dezelfde plek: segment XY bestaat maar heeft lengte nul.
        engine.place_or_move(Mark::Y, 10.0, 10.0).unwrap();
        engine.place_or_move(Mark::X, 10.0, 10.0).unwrap();

        let delta = engine.place_or_move(Mark::A, 3.0, 4.0).unwrap();
        let a = engine.scene().point(Mark::A).unwrap();
        assert_eq!(a.position, Point2::new(3.0, 4.0));
        assert_eq!(a.attachment, Some(registry::XY));
        assert!(delta.degeneracies.contains(&Degeneracy::Glue(Mark::A)));
    }

    #[test]
    fn degenerate_foot_length_falls_back_to_raw_xy() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 0.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        // YZ is langer dan het ontaarde XY, maar de loodvoet van Z op een
        // nullijn bestaat niet.
        let delta = engine.place_or_move(Mark::Z, 10.0, 0.0).unwrap();

        assert!(delta.degeneracies.contains(&Degeneracy::FootLength));
        assert!(!engine.scene().contains(Mark::W));
        assert!(close(delta.parameters[&Param::Length], 0.0));
    }

    #[test]
    fn parallel_carrier_skips_synthesis_of_i() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 0.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 100.0, 0.0).unwrap();
        // BG verticaal: evenwijdig aan de loodlijn uit C op het
        // horizontale XY.
        engine.place_or_move(Mark::B, 50.0, 10.0).unwrap();
        engine.place_or_move(Mark::G, 50.0, 90.0).unwrap();

        let delta = engine.place_or_move(Mark::A, 30.0, -5.0).unwrap();
        assert!(delta.degeneracies.contains(&Degeneracy::Synthesis(Mark::I)));
        assert!(!engine.scene().contains(Mark::I));
        assert!(engine.scene().contains(Mark::C));
    }

    #[test]
    fn length_uses_xy_when_it_is_longest() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 100.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        let delta = engine.place_or_move(Mark::Z, 120.0, 10.0).unwrap();

        assert!(close(delta.parameters[&Param::Length], 100.0 / 5.0));
        assert!(!engine.scene().contains(Mark::W));
    }

    #[test]
    fn length_synthesizes_w_when_yz_is_longer() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 100.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        let delta = engine.place_or_move(Mark::Z, 50.0, 120.0).unwrap();

        let w = engine.scene().point(Mark::W).expect("W gesynthetiseerd");
        assert!(close(w.position.x, 50.0));
        assert!(close(w.position.y, 0.0));
        assert_eq!(w.attachment, Some(registry::XY));
        assert!(engine.scene().contains_segment(registry::WY));
        assert!(engine.scene().contains_segment(registry::WZ));
        // |WY| = 50 pixels bij dpmm 5.
        assert!(close(delta.parameters[&Param::Length], 10.0));
    }

    #[test]
    fn moving_z_back_removes_w_again() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 100.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        engine.place_or_move(Mark::Z, 50.0, 120.0).unwrap();
        assert!(engine.scene().contains(Mark::W));

        let delta = engine.place_or_move(Mark::Z, 120.0, 10.0).unwrap();
        assert!(!engine.scene().contains(Mark::W));
        assert!(!engine.scene().contains_segment(registry::WY));
        assert!(!engine.scene().contains_segment(registry::WZ));
        assert!(delta.points_removed.contains(&Mark::W));
        assert!(delta.segments_removed.contains(&registry::WY));
        assert!(close(delta.parameters[&Param::Length], 20.0));
    }

    #[test]
    fn equal_lengths_take_the_plain_branch() {
        let mut engine = Engine::new(1.0).unwrap();
        engine.place_or_move(Mark::Y, 0.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 100.0, 0.0).unwrap();
        // |YZ| exact gelijk aan |XY|.
        let delta = engine.place_or_move(Mark::Z, -100.0, 0.0).unwrap();
        assert!(!engine.scene().contains(Mark::W));
        assert!(close(delta.parameters[&Param::Length], 100.0));
    }

    #[test]
    fn replaying_a_placement_changes_nothing() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.place_or_move(Mark::Y, 100.0, 0.0).unwrap();
        engine.place_or_move(Mark::X, 0.0, 0.0).unwrap();
        engine.place_or_move(Mark::Z, 120.0, 10.0).unwrap();

        let first: Vec<_> = engine.parameters().iter().collect();
        let delta = engine.place_or_move(Mark::Z, 120.0, 10.0).unwrap();
        let second: Vec<_> = engine.parameters().iter().collect();

        assert_eq!(first, second);
        assert!(delta.parameters.is_empty());
        assert!(delta.parameters_removed.is_empty());
    }

    #[test]
    fn chijin_is_the_ratio_of_de_to_ei() {
        let mut engine = Engine::new(5.0).unwrap();
        // Directe opbouw: I staat normaal alleen in de scene nadat de
        // engine hem afgeleid heeft.
        engine.scene.upsert(Landmark::new(Mark::D, Point2::new(40.0, 40.0)));
        engine.scene.upsert(Landmark::new(Mark::E, Point2::new(45.0, 45.0)));
        engine.scene.upsert(Landmark::new(Mark::I, Point2::new(50.0, 50.0)));

        let mut delta = super::PlacementDelta::default();
        engine.update_parameters(Mark::E, &mut delta).unwrap();
        assert!(close(delta.parameters[&Param::Chijin], 1.0));
        assert!(close(engine.parameters().get(Param::Chijin).unwrap(), 1.0));
    }

    #[test]
    fn chijin_with_coincident_e_and_i_is_skipped() {
        let mut engine = Engine::new(5.0).unwrap();
        engine.scene.upsert(Landmark::new(Mark::D, Point2::new(40.0, 40.0)));
        engine.scene.upsert(Landmark::new(Mark::E, Point2::new(45.0, 45.0)));
        engine.scene.upsert(Landmark::new(Mark::I, Point2::new(45.0, 45.0)));

        let mut delta = super::PlacementDelta::default();
        engine.update_parameters(Mark::E, &mut delta).unwrap();
        assert_eq!(engine.parameters().get(Param::Chijin), None);
        assert!(
            delta
                .degeneracies
                .contains(&Degeneracy::ZeroDenominator(Param::Chijin))
        );
    }

    #[test]
    fn next_expected_follows_the_placement_order() {
        let mut engine = Engine::new(5.0).unwrap();
        assert_eq!(engine.next_expected(), Some(Mark::Y));
        let delta = engine.place_or_move(Mark::Y, 0.0, 0.0).unwrap();
        assert_eq!(delta.next_expected, Some(Mark::X));
        // Buiten de volgorde plaatsen mag; de hint blijft het eerste gat.
        let delta = engine.place_or_move(Mark::G, 10.0, 10.0).unwrap();
        assert_eq!(delta.next_expected, Some(Mark::X));
    }
}
