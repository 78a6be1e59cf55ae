//! Heading estimation without relying on a libm `atan2`.
//!
//! The arctangent is a rational minimax approximation evaluated on a reduced
//! argument range, with the quadrant resolved from the signs of the inputs.
//! The constants are single precision values widened to `f64`.
#![allow(clippy::excessive_precision)]

use core::f64::consts::PI;

const SQ2P1: f64 = 2.414213562373095048802e0_f32 as f64;
const SQ2M1: f64 = 0.414213562373095048802e0_f32 as f64;
const PIO4: f64 = 0.785398163397448309615e0_f32 as f64;
const PIO2: f64 = 1.570796326794896619231e0_f32 as f64;

const ATAN_P4: f64 = 0.161536412982230228262e2_f32 as f64;
const ATAN_P3: f64 = 0.26842548195503973794141e3_f32 as f64;
const ATAN_P2: f64 = 0.11530293515404850115428136e4_f32 as f64;
const ATAN_P1: f64 = 0.178040631643319697105464587e4_f32 as f64;
const ATAN_P0: f64 = 0.89678597403663861959987488e3_f32 as f64;

const ATAN_Q4: f64 = 0.5895697050844462222791e2_f32 as f64;
const ATAN_Q3: f64 = 0.536265374031215315104235e3_f32 as f64;
const ATAN_Q2: f64 = 0.16667838148816337184521798e4_f32 as f64;
const ATAN_Q1: f64 = 0.207933497444540981287275926e4_f32 as f64;
const ATAN_Q0: f64 = 0.89678597403663861962481162e3_f32 as f64;

/// Heading in the XY plane, in degrees within `[0, 360)`.
pub fn heading_degrees(x: f64, y: f64) -> f64 {
    let mut degrees = atan2(y, x) * (180.0 / PI) + 180.0;

    // atan2 spans the closed interval [-pi, pi]
    if degrees < 0.0 {
        degrees += 360.0;
    }
    if degrees >= 360.0 {
        degrees -= 360.0;
    }

    degrees
}

/// Four-quadrant arctangent of `y / x`, in radians.
///
/// Returns `0` for the origin.
pub fn atan2(y: f64, x: f64) -> f64 {
    if y + x == y {
        if x == 0.0 && y == 0.0 {
            return 0.0;
        }

        if y >= 0.0 {
            PIO2
        } else {
            -PIO2
        }
    } else if x < 0.0 {
        if y >= 0.0 {
            PIO2 * 2.0 - atans(-y / x)
        } else {
            -PIO2 * 2.0 + atans(y / x)
        }
    } else if y > 0.0 {
        atans(y / x)
    } else {
        -atans(-y / x)
    }
}

/// Reduces the argument to `[-(sqrt(2) - 1), sqrt(2) - 1]`
fn atans(v: f64) -> f64 {
    let magnitude = if v < 0.0 { -v } else { v };

    if magnitude < SQ2M1 {
        atanx(v)
    } else if magnitude > SQ2P1 {
        PIO2 - atanx(1.0 / v)
    } else {
        PIO4 + atanx((v - 1.0) / (v + 1.0))
    }
}

fn atanx(v: f64) -> f64 {
    let argsq = v * v;

    let numerator = (((ATAN_P4 * argsq + ATAN_P3) * argsq + ATAN_P2) * argsq + ATAN_P1) * argsq
        + ATAN_P0;
    let denominator = ((((argsq + ATAN_Q4) * argsq + ATAN_Q3) * argsq + ATAN_Q2) * argsq
        + ATAN_Q1)
        * argsq
        + ATAN_Q0;

    numerator / denominator * v
}
