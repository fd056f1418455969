// sm-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Energy as UomEnergy, Force as UomForce,
    Length as UomLength, Mass as UomMass, Velocity as UomVelocity,
};
use uom::si::{ISQ, Quantity, SI};
use uom::typenum::{N1, N2, P1, Z0};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Energy = UomEnergy;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Velocity = UomVelocity;

/// Stiffness: force per unit length (N/m, i.e. kg/s²)
pub type Stiffness = Quantity<ISQ<Z0, P1, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Damping: force per unit velocity (N·s/m, i.e. kg/s)
pub type Damping = Quantity<ISQ<Z0, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn n(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn n_per_m(v: f64) -> Stiffness {
    n(v) / m(1.0)
}

#[inline]
pub fn n_s_per_m(v: f64) -> Damping {
    n(v) / mps(1.0)
}
