//! Default value functions for serde deserialization.
//!
//! Values follow the reference Mars-terrain experiment: a 60x42 grid at unit
//! step, 25 degree slope limit, beta = 3 and an RBF kernel of variance 30.

pub fn rows() -> usize {
    60
}

pub fn cols() -> usize {
    42
}

pub fn step() -> f64 {
    1.0
}

pub fn beta() -> f64 {
    3.0
}

pub fn max_slope_degrees() -> f64 {
    25.0
}

pub fn lengthscale() -> f64 {
    5.0
}

pub fn kernel_variance() -> f64 {
    30.0
}

pub fn noise_std() -> f64 {
    0.001
}

pub fn seed_center() -> Option<usize> {
    Some(77)
}

pub fn seed_radius() -> usize {
    1
}

pub fn iterations() -> usize {
    20
}

pub fn warm_up_repeats() -> usize {
    5
}
