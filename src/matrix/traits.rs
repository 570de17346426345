use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use std::ops::{Add, Div, Mul, Sub};

use crate::error::Result;

pub trait Element:  // Avoid repeating all the traits
    Clone
    + Zero
    + One
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + std::iter::Sum<Self>
    + ToPrimitive
    + FromPrimitive
    + std::fmt::Display
    + std::fmt::Debug
    + Send
    + Sync
{
}

impl<T> Element for T where
    T: Clone
        + Zero
        + One
        + PartialEq
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + std::iter::Sum<T>
        + ToPrimitive
        + FromPrimitive
    + FromPrimitive
        + std::fmt::Display
        + std::fmt::Debug
        + Send
        + Sync
{
}

/// Conversion between a container and plain nested `Vec`s.
pub trait ListConvert<T>
where
    Self: Sized,
{
    type List;

    fn from_list(list: Self::List) -> Result<Self>;
    fn to_list(&self) -> Self::List;
}
