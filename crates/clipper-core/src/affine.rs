// Author: Dustin Pilgrim
// License: MIT

use crate::error::{ClipError, Result};
use crate::region::{OrientedRect, Shear};

const SINGULAR_EPS: f64 = 1e-12;

/// 2x3 affine transform `[a b tx; c d ty]`, kept on the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m: [[f64; 3]; 2],
}

impl Affine {
    /// Pure rotation by `angle` degrees (counter-clockwise on screen)
    /// followed by a translation to `(ox, oy)`.
    pub fn rotation_about(ox: f64, oy: f64, angle: f64) -> Self {
        let (s, c) = (-angle.to_radians()).sin_cos();
        Self {
            m: [[c, -s, ox], [s, c, oy]],
        }
    }

    /// Maps the unit square onto the region: `R(angle) * [w shx; shy h]`
    /// with translation to the region origin.
    pub fn from_region(rect: &OrientedRect, shear: Shear) -> Result<Self> {
        if !(rect.width > 0.0 && rect.height > 0.0) {
            return Err(ClipError::AffineSingular);
        }

        let (s, c) = (-(rect.angle as f64).to_radians()).sin_cos();
        let (w, h) = (rect.width as f64, rect.height as f64);
        let (shx, shy) = (shear.x as f64, shear.y as f64);

        Ok(Self {
            m: [
                [c * w - s * shy, c * shx - s * h, rect.x as f64],
                [s * w + c * shy, s * shx + c * h, rect.y as f64],
            ],
        })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, b, tx], [c, d, ty]] = self.m;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// Same as `apply`, rounded to the nearest pixel (halves round up).
    pub fn apply_rounded(&self, x: f64, y: f64) -> (i64, i64) {
        let (xp, yp) = self.apply(x, y);
        ((xp + 0.5).floor() as i64, (yp + 0.5).floor() as i64)
    }

    pub fn determinant(&self) -> f64 {
        let [[a, b, _], [c, d, _]] = self.m;
        a * d - b * c
    }

    /// Inverse of the homogeneous 3x3 `[A t; 0 0 1]`, dropped back to 2x3.
    pub fn invert(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return Err(ClipError::AffineSingular);
        }

        let [[a, b, tx], [c, d, ty]] = self.m;
        let inv = 1.0 / det;
        let (ia, ib, ic, id) = (d * inv, -b * inv, -c * inv, a * inv);

        Ok(Self {
            m: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
            ],
        })
    }
}
