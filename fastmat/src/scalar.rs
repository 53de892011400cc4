//! Trait bounds for the element type of a [`Matrix`](crate::matrix::Matrix).
//!
//! Any primitive number satisfies [`Scalar`]. Integer types work for storage and arithmetic,
//! but the LU engine divides, so integer echelon forms truncate. FastMap needs [`num::Float`].

use std::fmt::{Debug, Display};

use num::Num;

pub trait Scalar: Num + Copy + PartialOrd + Debug + Display + Send + Sync {}

impl<T> Scalar for T where T: Num + Copy + PartialOrd + Debug + Display + Send + Sync {}
