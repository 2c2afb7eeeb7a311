/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/

pub mod algorithms;
pub mod edit;
pub mod overlay;
pub mod structures;
pub mod utils;
pub mod vector;
