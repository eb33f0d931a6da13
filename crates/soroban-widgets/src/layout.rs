#![forbid(unsafe_code)]

//! Screen placement of rods and beads.
//!
//! Rods stand vertically, left to right, most significant first. The Heavy
//! zone sits above the divider and the Light zone below it:
//!
//! ```text
//!   origin ┌─────┬─────┬─────┐
//!          │  ▇  │     │  ▇  │   heavy zone  (travel + bead_span)
//!          │     │  ▇  │     │
//!          ├═════┼═════┼═════┤   divider
//!          │  ▇  │     │  ▇  │
//!          │  ▇  │     │  ▇  │   light zone  (travel + 4·span + 3·gap)
//!          │     │  ▇  │  ▇  │
//!          └─────┴─────┴─────┘
//! ```
//!
//! Offsets grow away from the divider in both zones, so a downward pointer
//! movement of `dy` is `-dy` along the Heavy axis and `+dy` along the Light
//! axis (see [`FrameLayout::axis_delta`]).

use soroban_core::geometry::{Point, Rect};
use soroban_model::{Abacus, BeadId, LIGHT_BEADS, Role, TravelGeometry};

/// Maps model offsets to local-space rectangles and back.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    origin: Point,
    geometry: TravelGeometry,
    rods: usize,
    rod_pitch: f64,
    bead_width: f64,
    divider_thickness: f64,
}

impl FrameLayout {
    /// Layout with bead width `2·bead_span`, a quarter-span gutter between
    /// rods, and a divider a quarter-span thick.
    #[must_use]
    pub fn new(geometry: TravelGeometry, rods: usize) -> Self {
        let bead_width = geometry.bead_span * 2.0;
        Self {
            origin: Point::default(),
            geometry,
            rods,
            rod_pitch: bead_width + geometry.bead_span * 0.25,
            bead_width,
            divider_thickness: geometry.bead_span * 0.25,
        }
    }

    /// Layout matching an abacus' current configuration.
    #[must_use]
    pub fn for_abacus(abacus: &Abacus) -> Self {
        Self::new(*abacus.geometry(), abacus.rod_count())
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Distance between rod centres. Clamped to at least the bead width.
    #[must_use]
    pub fn with_rod_pitch(mut self, pitch: f64) -> Self {
        self.rod_pitch = pitch.max(self.bead_width);
        self
    }

    #[must_use]
    pub fn with_divider_thickness(mut self, thickness: f64) -> Self {
        self.divider_thickness = thickness.max(0.0);
        self
    }

    #[must_use]
    pub fn rods(&self) -> usize {
        self.rods
    }

    #[must_use]
    pub fn geometry(&self) -> &TravelGeometry {
        &self.geometry
    }

    /// The whole frame.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.rod_pitch * self.rods as f64,
            self.geometry.heavy_zone_len() + self.divider_thickness + self.geometry.light_zone_len(),
        )
    }

    /// Top edge of the divider.
    #[must_use]
    pub fn divider_y(&self) -> f64 {
        self.origin.y + self.geometry.heavy_zone_len()
    }

    #[must_use]
    pub fn divider_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.divider_y(),
            self.rod_pitch * self.rods as f64,
            self.divider_thickness,
        )
    }

    /// Column occupied by `rod`, spanning both zones.
    #[must_use]
    pub fn rod_rect(&self, rod: usize) -> Rect {
        let bounds = self.bounds();
        Rect::new(
            self.origin.x + self.rod_pitch * rod as f64,
            bounds.y,
            self.rod_pitch,
            bounds.height,
        )
    }

    /// Rectangle of a bead sitting at `offset`.
    #[must_use]
    pub fn bead_rect(&self, id: BeadId, offset: f64) -> Rect {
        let column = self.rod_rect(id.rod);
        let x = column.center().x - self.bead_width / 2.0;
        let span = self.geometry.bead_span;
        let y = match id.role {
            Role::Heavy => self.divider_y() - offset - span,
            Role::Light => self.divider_y() + self.divider_thickness + offset,
        };
        Rect::new(x, y, self.bead_width, span)
    }

    /// Rod whose column contains `x`.
    #[must_use]
    pub fn rod_at(&self, x: f64) -> Option<usize> {
        let local = x - self.origin.x;
        if local < 0.0 || self.rod_pitch <= 0.0 {
            return None;
        }
        let rod = (local / self.rod_pitch) as usize;
        (rod < self.rods).then_some(rod)
    }

    /// Bead under `point`, using the abacus' model offsets.
    #[must_use]
    pub fn hit_test(&self, abacus: &Abacus, point: Point) -> Option<BeadId> {
        self.hit_test_with(abacus.rod_count(), point, |id| abacus.bead(id).offset)
    }

    /// Bead under `point` on a frame of `rods` rods, with each bead drawn at
    /// `offset_of(id)`.
    #[must_use]
    pub fn hit_test_with(
        &self,
        rods: usize,
        point: Point,
        offset_of: impl Fn(BeadId) -> f64,
    ) -> Option<BeadId> {
        let rod = self.rod_at(point.x)?;
        if rod >= rods || !self.bounds().contains(point) {
            return None;
        }

        std::iter::once(BeadId::heavy(rod))
            .chain((0..LIGHT_BEADS).map(|slot| BeadId::light(rod, slot)))
            .find(|&id| self.bead_rect(id, offset_of(id)).contains(point))
    }

    /// Convert a vertical pointer delta into an offset delta along `role`'s axis.
    #[must_use]
    pub fn axis_delta(role: Role, dy: f64) -> f64 {
        match role {
            Role::Heavy => -dy,
            Role::Light => dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_model::AbacusConfig;

    // s = 20, g = 2, t = 20: heavy zone 40, light zone 106.
    fn abacus() -> Abacus {
        Abacus::new(AbacusConfig {
            rods: 3,
            bead_span: 20.0,
            min_gap: 2.0,
            travel: 20.0,
            ..AbacusConfig::default()
        })
        .unwrap()
    }

    fn layout(abacus: &Abacus) -> FrameLayout {
        FrameLayout::for_abacus(abacus)
            .with_rod_pitch(50.0)
            .with_divider_thickness(4.0)
    }

    #[test]
    fn frame_bounds() {
        let ab = abacus();
        let l = layout(&ab);
        assert_eq!(l.bounds(), Rect::new(0.0, 0.0, 150.0, 40.0 + 4.0 + 106.0));
        assert_eq!(l.divider_y(), 40.0);
        assert_eq!(l.divider_rect().height, 4.0);
    }

    #[test]
    fn bead_rects_follow_offsets() {
        let ab = abacus();
        let l = layout(&ab);
        // Inactive heavy sits at the top of its zone.
        let heavy = l.bead_rect(BeadId::heavy(1), 20.0);
        assert_eq!(heavy.y, 0.0);
        assert_eq!(heavy.bottom(), 20.0);
        // Active heavy touches the divider.
        assert_eq!(l.bead_rect(BeadId::heavy(1), 0.0).bottom(), 40.0);
        // Active light slot 0 touches the divider's lower edge.
        assert_eq!(l.bead_rect(BeadId::light(1, 0), 0.0).y, 44.0);
        // Bead is centred in its column.
        assert_eq!(heavy.center().x, 75.0);
    }

    #[test]
    fn rod_lookup() {
        let ab = abacus();
        let l = layout(&ab).with_origin(Point::new(10.0, 0.0));
        assert_eq!(l.rod_at(5.0), None);
        assert_eq!(l.rod_at(10.0), Some(0));
        assert_eq!(l.rod_at(109.9), Some(1));
        assert_eq!(l.rod_at(160.0), None);
    }

    #[test]
    fn hit_test_finds_beads() {
        let mut ab = abacus();
        ab.set_value(5).unwrap();
        let l = layout(&ab);

        // Rod 2 heavy is active: just above the divider.
        assert_eq!(l.hit_test(&ab, Point::new(125.0, 30.0)), Some(BeadId::heavy(2)));
        // Rod 0 heavy is inactive: top of the zone.
        assert_eq!(l.hit_test(&ab, Point::new(25.0, 5.0)), Some(BeadId::heavy(0)));
        assert_eq!(l.hit_test(&ab, Point::new(25.0, 30.0)), None);
        // Rod 0 light slot 1 inactive at 42: y = 44 + 42 .. 106.
        assert_eq!(
            l.hit_test(&ab, Point::new(25.0, 90.0)),
            Some(BeadId::light(0, 1))
        );
        // Outside the bead width.
        assert_eq!(l.hit_test(&ab, Point::new(2.0, 90.0)), None);
        // Below the frame.
        assert_eq!(l.hit_test(&ab, Point::new(25.0, 500.0)), None);
    }

    #[test]
    fn hit_test_with_uses_given_offsets() {
        let ab = abacus();
        let l = layout(&ab);
        let model = |id: BeadId| ab.bead(id).offset;
        // Heavy drawn halfway home: y = 10..30.
        let gliding = |id: BeadId| if id == BeadId::heavy(0) { 10.0 } else { model(id) };

        assert_eq!(l.hit_test_with(3, Point::new(25.0, 25.0), model), None);
        assert_eq!(
            l.hit_test_with(3, Point::new(25.0, 25.0), gliding),
            Some(BeadId::heavy(0))
        );
        // Rods past the frame's count are ignored.
        assert_eq!(l.hit_test_with(2, Point::new(125.0, 5.0), model), None);
    }

    #[test]
    fn axis_directions() {
        assert_eq!(FrameLayout::axis_delta(Role::Heavy, 5.0), -5.0);
        assert_eq!(FrameLayout::axis_delta(Role::Light, 5.0), 5.0);
    }
}
