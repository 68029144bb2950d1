use crate::rules::{Add as AddRule, Div as DivRule, Mul as MulRule, Neg as NegRule, Sub as SubRule};
use crate::var::Var;
use std::ops::*;

macro_rules! impl_assign {
    ($Trait:ident, $func:ident, $Rule:ty) => {
        impl $Trait<&Var> for Var {
            fn $func(&mut self, rhs: &Var) {
                self.apply_binary::<$Rule>(rhs);
            }
        }
        impl $Trait<Var> for Var {
            fn $func(&mut self, rhs: Var) {
                self.apply_binary::<$Rule>(&rhs);
            }
        }
        impl $Trait<f64> for Var {
            fn $func(&mut self, rhs: f64) {
                self.apply_binary::<$Rule>(&Var::new(rhs));
            }
        }
    };
}

impl_assign!(AddAssign, add_assign, AddRule);
impl_assign!(SubAssign, sub_assign, SubRule);
impl_assign!(MulAssign, mul_assign, MulRule);
impl_assign!(DivAssign, div_assign, DivRule);

macro_rules! impl_bin_ops {
    ($Trait:ident, $func:ident, $Rule:ty) => {
        impl $Trait<&Var> for &Var {
            type Output = Var;
            fn $func(self, rhs: &Var) -> Var {
                self.binary::<$Rule>(rhs)
            }
        }
        impl $Trait<Var> for &Var {
            type Output = Var;
            fn $func(self, rhs: Var) -> Var {
                self.binary::<$Rule>(&rhs)
            }
        }
        impl $Trait<&Var> for Var {
            type Output = Var;
            fn $func(mut self, rhs: &Var) -> Var {
                self.apply_binary::<$Rule>(rhs);
                self
            }
        }
        impl $Trait<Var> for Var {
            type Output = Var;
            fn $func(mut self, rhs: Var) -> Var {
                self.apply_binary::<$Rule>(&rhs);
                self
            }
        }
        impl $Trait<f64> for &Var {
            type Output = Var;
            fn $func(self, rhs: f64) -> Var {
                self.binary::<$Rule>(&Var::new(rhs))
            }
        }
        impl $Trait<f64> for Var {
            type Output = Var;
            fn $func(mut self, rhs: f64) -> Var {
                self.apply_binary::<$Rule>(&Var::new(rhs));
                self
            }
        }
        impl $Trait<&Var> for f64 {
            type Output = Var;
            fn $func(self, rhs: &Var) -> Var {
                Var::new(self).binary::<$Rule>(rhs)
            }
        }
        impl $Trait<Var> for f64 {
            type Output = Var;
            fn $func(self, rhs: Var) -> Var {
                Var::new(self).binary::<$Rule>(&rhs)
            }
        }
    };
}

impl_bin_ops!(Add, add, AddRule);
impl_bin_ops!(Sub, sub, SubRule);
impl_bin_ops!(Mul, mul, MulRule);
impl_bin_ops!(Div, div, DivRule);

impl Neg for &Var {
    type Output = Var;
    fn neg(self) -> Var {
        self.unary::<NegRule>()
    }
}
impl Neg for Var {
    type Output = Var;
    fn neg(self) -> Var {
        self.unary::<NegRule>()
    }
}
