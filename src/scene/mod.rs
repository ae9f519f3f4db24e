//! Opslag van landmarks en segmenten van een opmeetscene.
//!
//! De scene is een passieve container: alle herberekening wordt door de
//! propagatie-engine aangestuurd. Punten en lijnen zijn direct op naam
//! geïndexeerd; er wordt nooit over een generieke itemlijst gescand.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::geom::{Line2, Point2};

/// Weergavestraal van een punt in pixels; niet betekenisdragend voor de
/// berekeningen, alleen meegedragen voor de tekenlaag.
pub const DEFAULT_RADIUS: f64 = 3.0;

// ─────────────────────────────────────────────────────────────────────────────
// Mark
// ─────────────────────────────────────────────────────────────────────────────

/// Naam van een landmark op de voetafbeelding.
///
/// `Y` t/m `N` worden door de gebruiker geplaatst; `C`, `I`, `K` en `W`
/// worden door de engine afgeleid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Y,
    X,
    Z,
    F,
    H,
    B,
    G,
    A,
    D,
    E,
    L,
    M,
    N,
    C,
    I,
    K,
    W,
}

impl Mark {
    /// Alle landmarks, geplaatste en afgeleide.
    pub const ALL: [Self; 17] = [
        Self::Y,
        Self::X,
        Self::Z,
        Self::F,
        Self::H,
        Self::B,
        Self::G,
        Self::A,
        Self::D,
        Self::E,
        Self::L,
        Self::M,
        Self::N,
        Self::C,
        Self::I,
        Self::K,
        Self::W,
    ];

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Y => 'Y',
            Self::X => 'X',
            Self::Z => 'Z',
            Self::F => 'F',
            Self::H => 'H',
            Self::B => 'B',
            Self::G => 'G',
            Self::A => 'A',
            Self::D => 'D',
            Self::E => 'E',
            Self::L => 'L',
            Self::M => 'M',
            Self::N => 'N',
            Self::C => 'C',
            Self::I => 'I',
            Self::K => 'K',
            Self::W => 'W',
        }
    }

    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'Y' => Some(Self::Y),
            'X' => Some(Self::X),
            'Z' => Some(Self::Z),
            'F' => Some(Self::F),
            'H' => Some(Self::H),
            'B' => Some(Self::B),
            'G' => Some(Self::G),
            'A' => Some(Self::A),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'L' => Some(Self::L),
            'M' => Some(Self::M),
            'N' => Some(Self::N),
            'C' => Some(Self::C),
            'I' => Some(Self::I),
            'K' => Some(Self::K),
            'W' => Some(Self::W),
            _ => None,
        }
    }

    /// Geeft aan of dit punt door de engine gesynthetiseerd wordt in plaats
    /// van direct door de gebruiker geplaatst.
    #[must_use]
    pub const fn is_derived(self) -> bool {
        matches!(self, Self::C | Self::I | Self::K | Self::W)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Mark {
    type Err = UnknownMark;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                Self::from_letter(letter).ok_or_else(|| UnknownMark(s.to_owned()))
            }
            _ => Err(UnknownMark(s.to_owned())),
        }
    }
}

impl Serialize for Mark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fout voor een naam die geen bekend landmark is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMark(pub String);

impl fmt::Display for UnknownMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "onbekend landmark `{}`", self.0)
    }
}

impl std::error::Error for UnknownMark {}

// ─────────────────────────────────────────────────────────────────────────────
// SegmentKey
// ─────────────────────────────────────────────────────────────────────────────

/// Canonieke naam van een segment: de twee eindpuntletters alfabetisch
/// gesorteerd, dus `segment_key(Y, X)` en `segment_key(X, Y)` zijn beide
/// `"XY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentKey {
    first: Mark,
    second: Mark,
}

impl SegmentKey {
    #[must_use]
    pub const fn new(a: Mark, b: Mark) -> Self {
        if a.letter() as u32 <= b.letter() as u32 {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    #[must_use]
    pub const fn first(self) -> Mark {
        self.first
    }

    #[must_use]
    pub const fn second(self) -> Mark {
        self.second
    }

    #[must_use]
    pub const fn contains(self, mark: Mark) -> bool {
        self.first as u32 == mark as u32 || self.second as u32 == mark as u32
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first.letter(), self.second.letter())
    }
}

impl FromStr for SegmentKey {
    type Err = NonCanonicalKey;

    /// Accepteert uitsluitend de canonieke vorm: exact twee bekende letters
    /// in alfabetische volgorde.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(a), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(NonCanonicalKey(s.to_owned()));
        };
        let (Some(first), Some(second)) = (Mark::from_letter(a), Mark::from_letter(b)) else {
            return Err(NonCanonicalKey(s.to_owned()));
        };
        if a >= b {
            return Err(NonCanonicalKey(s.to_owned()));
        }
        Ok(Self { first, second })
    }
}

impl Serialize for SegmentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fout voor een segmentnaam die niet in de canonieke tweelettervorm staat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonCanonicalKey(pub String);

impl fmt::Display for NonCanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segmentnaam `{}` is niet canoniek", self.0)
    }
}

impl std::error::Error for NonCanonicalKey {}

// ─────────────────────────────────────────────────────────────────────────────
// Landmark & Segment
// ─────────────────────────────────────────────────────────────────────────────

/// Een geplaatst of afgeleid punt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub mark: Mark,
    pub position: Point2,
    /// Alleen voor de tekenlaag.
    pub radius: f64,
    /// Segment waar dit punt logisch kind van is; het punt wordt mee
    /// verwijderd wanneer dat segment cascadegewijs verdwijnt. De positie
    /// blijft eigen data en wordt nooit uit de parent herleid.
    pub attachment: Option<SegmentKey>,
}

impl Landmark {
    #[must_use]
    pub const fn new(mark: Mark, position: Point2) -> Self {
        Self {
            mark,
            position,
            radius: DEFAULT_RADIUS,
            attachment: None,
        }
    }

    #[must_use]
    pub const fn attached_to(mut self, key: SegmentKey) -> Self {
        self.attachment = Some(key);
        self
    }
}

/// Een lijn tussen twee landmarks. De eindpuntposities zijn vastgelegd op
/// het moment van bouwen; verplaatst een eindpunt, dan moet het segment
/// expliciet herbouwd worden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub key: SegmentKey,
    pub line: Line2,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene
// ─────────────────────────────────────────────────────────────────────────────

/// Passieve opslag van punten en segmenten, beide direct op naam
/// geïndexeerd.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    points: BTreeMap<Mark, Landmark>,
    segments: BTreeMap<SegmentKey, Segment>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maakt of vervangt het punt met deze naam. Geeft het oude punt terug
    /// wanneer er vervangen werd. Vervangen ruimt niets anders op; de engine
    /// herbouwt aansluitende segmenten in de LineUpdate-fase.
    pub fn upsert(&mut self, landmark: Landmark) -> Option<Landmark> {
        self.points.insert(landmark.mark, landmark)
    }

    #[must_use]
    pub fn point(&self, mark: Mark) -> Option<&Landmark> {
        self.points.get(&mark)
    }

    #[must_use]
    pub fn position(&self, mark: Mark) -> Option<Point2> {
        self.points.get(&mark).map(|landmark| landmark.position)
    }

    #[must_use]
    pub fn contains(&self, mark: Mark) -> bool {
        self.points.contains_key(&mark)
    }

    #[must_use]
    pub fn contains_segment(&self, key: SegmentKey) -> bool {
        self.segments.contains_key(&key)
    }

    /// Maakt of vervangt een segment. Vervangen laat aangehechte punten met
    /// rust; alleen expliciete verwijdering cascadeert.
    pub fn upsert_segment(&mut self, segment: Segment) -> Option<Segment> {
        self.segments.insert(segment.key, segment)
    }

    #[must_use]
    pub fn segment(&self, key: SegmentKey) -> Option<&Segment> {
        self.segments.get(&key)
    }

    pub fn points(&self) -> impl Iterator<Item = &Landmark> {
        self.points.values()
    }

    pub fn marks(&self) -> impl Iterator<Item = Mark> + '_ {
        self.points.keys().copied()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    pub fn segment_keys(&self) -> impl Iterator<Item = SegmentKey> + '_ {
        self.segments.keys().copied()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Verwijdert een punt met expliciete cascade: eerst alle segmenten die
    /// het punt als eindpunt hebben (elk met hun aangehechte kinderen),
    /// daarna het punt zelf. De verwijdervolgorde ligt daarmee vast en kan
    /// nooit "verkeerd om" lopen.
    pub fn remove_point_cascade(&mut self, mark: Mark, removed: &mut Removals) {
        let touching: Vec<SegmentKey> = self
            .segments
            .keys()
            .copied()
            .filter(|key| key.contains(mark))
            .collect();
        for key in touching {
            self.remove_segment_cascade(key, removed);
        }
        if self.points.remove(&mark).is_some() {
            removed.points.push(mark);
        }
    }

    /// Verwijdert een segment met expliciete cascade: eerst de punten die
    /// aan dit segment hangen, daarna het segment zelf.
    pub fn remove_segment_cascade(&mut self, key: SegmentKey, removed: &mut Removals) {
        let children: Vec<Mark> = self
            .points
            .values()
            .filter(|landmark| landmark.attachment == Some(key))
            .map(|landmark| landmark.mark)
            .collect();
        for child in children {
            self.remove_point_cascade(child, removed);
        }
        if self.segments.remove(&key).is_some() {
            removed.segments.push(key);
        }
    }
}

/// Administratie van wat een cascade daadwerkelijk verwijderd heeft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removals {
    pub points: Vec<Mark>,
    pub segments: Vec<SegmentKey>,
}

impl Removals {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Landmark, Mark, Removals, Scene, Segment, SegmentKey};
    use crate::geom::{Line2, Point2};

    fn segment(a: Mark, b: Mark, scene: &Scene) -> Segment {
        let key = SegmentKey::new(a, b);
        let line = Line2::new(
            scene.position(a).expect("eindpunt aanwezig"),
            scene.position(b).expect("eindpunt aanwezig"),
        );
        Segment { key, line }
    }

    #[test]
    fn segment_keys_are_canonical() {
        let yx = SegmentKey::new(Mark::Y, Mark::X);
        let xy = SegmentKey::new(Mark::X, Mark::Y);
        assert_eq!(yx, xy);
        assert_eq!(yx.to_string(), "XY");
    }

    #[test]
    fn segment_key_parsing_rejects_non_canonical_forms() {
        assert_eq!("IK".parse::<SegmentKey>().unwrap(), SegmentKey::new(Mark::I, Mark::K));
        assert!("YX".parse::<SegmentKey>().is_err());
        assert!("X".parse::<SegmentKey>().is_err());
        assert!("XYZ".parse::<SegmentKey>().is_err());
        assert!("XQ".parse::<SegmentKey>().is_err());
    }

    #[test]
    fn mark_round_trips_through_strings() {
        for mark in Mark::ALL {
            assert_eq!(mark.to_string().parse::<Mark>().unwrap(), mark);
        }
        assert!("Q".parse::<Mark>().is_err());
        assert!("".parse::<Mark>().is_err());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut scene = Scene::new();
        assert!(
            scene
                .upsert(Landmark::new(Mark::Y, Point2::new(1.0, 2.0)))
                .is_none()
        );
        let old = scene
            .upsert(Landmark::new(Mark::Y, Point2::new(3.0, 4.0)))
            .expect("oud punt terug");
        assert_eq!(old.position, Point2::new(1.0, 2.0));
        assert_eq!(scene.point_count(), 1);
        assert_eq!(scene.position(Mark::Y), Some(Point2::new(3.0, 4.0)));
    }

    #[test]
    fn removing_a_point_cascades_through_segments_and_children() {
        let mut scene = Scene::new();
        scene.upsert(Landmark::new(Mark::I, Point2::new(0.0, 0.0)));
        scene.upsert(Landmark::new(Mark::K, Point2::new(10.0, 0.0)));
        let ik = SegmentKey::new(Mark::I, Mark::K);
        scene.upsert_segment(segment(Mark::I, Mark::K, &scene));
        // D hangt aan IK, zoals na het vastplakken door de engine.
        scene.upsert(Landmark::new(Mark::D, Point2::new(4.0, 0.0)).attached_to(ik));

        let mut removed = Removals::default();
        scene.remove_point_cascade(Mark::I, &mut removed);

        assert!(!scene.contains(Mark::I));
        assert!(!scene.contains(Mark::D));
        assert!(!scene.contains_segment(ik));
        assert!(scene.contains(Mark::K));
        assert_eq!(removed.segments, vec![ik]);
        assert!(removed.points.contains(&Mark::I));
        assert!(removed.points.contains(&Mark::D));
    }

    #[test]
    fn replacing_a_segment_keeps_attached_children() {
        let mut scene = Scene::new();
        scene.upsert(Landmark::new(Mark::X, Point2::new(0.0, 0.0)));
        scene.upsert(Landmark::new(Mark::Y, Point2::new(0.0, 10.0)));
        let xy = SegmentKey::new(Mark::X, Mark::Y);
        scene.upsert_segment(segment(Mark::X, Mark::Y, &scene));
        scene.upsert(Landmark::new(Mark::A, Point2::new(0.0, 2.0)).attached_to(xy));

        scene.upsert(Landmark::new(Mark::Y, Point2::new(5.0, 10.0)));
        scene.upsert_segment(segment(Mark::X, Mark::Y, &scene));

        assert!(scene.contains(Mark::A));
        assert_eq!(
            scene.segment(xy).expect("segment herbouwd").line.p2,
            Point2::new(5.0, 10.0)
        );
    }
}
