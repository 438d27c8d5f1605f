//! Numeric element types accepted by image plots.

/// A numeric array element that can be displayed.
pub trait Scalar: Copy + std::fmt::Debug + 'static {
    /// Name of the element type, as NumPy spells it.
    const DTYPE: &'static str;

    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Scalar for $t {
                const DTYPE: &'static str = $name;

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar!(
    u8 => "uint8",
    u16 => "uint16",
    i16 => "int16",
    i32 => "int32",
    f32 => "float32",
    f64 => "float64",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_names() {
        assert_eq!(u8::DTYPE, "uint8");
        assert_eq!(f64::DTYPE, "float64");
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(200u8.to_f64(), 200.0);
        assert_eq!((-3i16).to_f64(), -3.0);
        assert_eq!(0.5f32.to_f64(), 0.5);
    }
}
