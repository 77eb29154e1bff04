pub type Intensityf32 = f32;
pub type Weightf32    = f32;
pub type Anglef32     = f32; // radians, unless the name says degrees

pub type Index1 = usize;
pub type Index2 = [usize; 2];

pub const PI: Anglef32 = std::f32::consts::PI;
