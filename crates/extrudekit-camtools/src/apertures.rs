//! Aperture and lattice path generators
//!
//! Generators drive a [`MotionEmitter`] through its public move operations.
//! All moves start from the emitter's current position; the square and
//! rectangle apertures start at the corner with the smallest X and Y.

use crate::emitter::MotionEmitter;
use crate::move_request::MoveRequest;
use extrudekit_core::{ConfigurationError, Result};

/// Default fraction by which neighbouring beads overlap
pub const DEFAULT_OVERLAP: f64 = 0.25;

/// Generator for hollow apertures and lattices
pub struct ApertureGenerator<'a> {
    emitter: &'a mut MotionEmitter,
}

impl<'a> ApertureGenerator<'a> {
    pub fn new(emitter: &'a mut MotionEmitter) -> Self {
        Self { emitter }
    }

    /// Centre-to-centre distance of neighbouring beads
    ///
    /// Also checks the flow geometry so a generator fails before its first
    /// move instead of part-way through.
    fn stride(&self, overlap: f64) -> Result<f64> {
        if !(0.0..1.0).contains(&overlap) {
            return Err(ConfigurationError::invalid("overlap", "must be in [0, 1)").into());
        }
        let geometry = self.emitter.flow_geometry()?;
        let stride = geometry.layer_width() * (1.0 - overlap);
        if stride <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                param: "stride".to_string(),
                value: stride,
            }
            .into());
        }
        Ok(stride)
    }

    /// Reject bounds that would never terminate a loop
    fn check_finite(bounds: &[(&str, f64)]) -> Result<()> {
        for (param, value) in bounds {
            if !value.is_finite() {
                return Err(ConfigurationError::invalid(*param, "must be finite").into());
            }
        }
        Ok(())
    }

    fn print_x(&mut self, x: f64) -> Result<()> {
        self.emitter.extrude_move(MoveRequest::incremental().x(x))
    }

    fn print_y(&mut self, y: f64) -> Result<()> {
        self.emitter.extrude_move(MoveRequest::incremental().y(y))
    }

    /// Hollow square, spiralling inward from the outer edge
    pub fn square_aperture(&mut self, outer: f64, inner: f64, overlap: f64) -> Result<()> {
        Self::check_finite(&[("outer", outer), ("inner", inner)])?;
        let stride = self.stride(overlap)?;
        tracing::debug!(
            "Square aperture {:.3} -> {:.3}mm, stride {:.3}mm",
            outer,
            inner,
            stride
        );

        let mut side = outer;
        while side > inner {
            self.print_x(side)?;
            self.print_y(side)?;
            side -= stride;
            self.print_x(-side)?;
            self.print_y(-side)?;
            side -= stride;
        }
        Ok(())
    }

    /// Hollow rectangle, expected to be wider in X than in Y
    ///
    /// Spirals outward from the inner rectangle until the Y extent reaches
    /// `outer_y`, then fills the remaining width on both X ends with
    /// meandering blocks. The block on the high-X side uses the final spiral
    /// height as its bar length.
    pub fn rect_aperture(
        &mut self,
        outer_x: f64,
        outer_y: f64,
        inner_x: f64,
        inner_y: f64,
        overlap: f64,
    ) -> Result<()> {
        Self::check_finite(&[
            ("outer_x", outer_x),
            ("outer_y", outer_y),
            ("inner_x", inner_x),
            ("inner_y", inner_y),
        ])?;
        let stride = self.stride(overlap)?;
        let start = self.emitter.current_position();
        tracing::debug!(
            "Rect aperture {:.3}x{:.3} around {:.3}x{:.3}, stride {:.3}mm",
            outer_x,
            outer_y,
            inner_x,
            inner_y,
            stride
        );

        let mut curr_x = inner_x;
        let mut curr_y = inner_y;
        while curr_y < outer_y {
            self.print_x(curr_x)?;
            self.print_y(curr_y)?;
            curr_x += stride;
            curr_y += stride;
            self.print_x(-curr_x)?;
            if curr_y >= outer_y {
                break;
            }
            self.print_y(-curr_y)?;
            curr_x += stride;
            curr_y += stride;
        }

        let frame = outer_y - inner_y;
        let block_width = (outer_x - (inner_x + frame)) / 2.0;

        // low-X block
        self.emitter
            .travel_move(MoveRequest::absolute().x(start.x - frame / 2.0))?;
        self.emitter
            .travel_move(MoveRequest::absolute().y(start.y - frame / 2.0))?;
        self.meander(block_width, outer_y, -stride)?;

        // high-X block
        self.emitter.travel_move(
            MoveRequest::absolute().x(start.x + inner_x + frame / 2.0 + stride / 2.0),
        )?;
        self.emitter
            .travel_move(MoveRequest::absolute().y(start.y - frame / 2.0))?;
        self.meander(block_width, curr_y, stride)?;
        Ok(())
    }

    /// Back-and-forth Y bars stepping by `step` in X until `width` is covered
    fn meander(&mut self, width: f64, bar: f64, step: f64) -> Result<()> {
        let stride = step.abs();
        let mut covered = 0.0;
        while covered < width {
            self.print_y(bar)?;
            covered += stride;
            if covered >= width {
                break;
            }
            self.print_x(step)?;
            self.print_y(-bar)?;
            covered += stride;
            if covered >= width {
                break;
            }
            self.print_x(step)?;
        }
        Ok(())
    }

    /// Lattice of X bars `spacing` apart, covering `extent` in Y
    ///
    /// Each pass prints a bar out and a bar back and uses up `2 * spacing`
    /// of the extent, so passes continue while any extent remains.
    pub fn lattice(&mut self, extent: f64, spacing: f64, length: f64) -> Result<()> {
        Self::check_finite(&[("extent", extent), ("length", length)])?;
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                param: "spacing".to_string(),
                value: spacing,
            }
            .into());
        }
        self.emitter.flow_geometry()?;
        tracing::debug!(
            "Lattice over {:.3}mm, bars {:.3}mm long, {:.3}mm apart",
            extent,
            length,
            spacing
        );

        let mut remaining = extent;
        while remaining > 0.0 {
            self.print_x(length)?;
            self.print_y(spacing)?;
            self.print_x(-length)?;
            self.print_y(spacing)?;
            remaining -= 2.0 * spacing;
        }
        Ok(())
    }
}
