//! Prime field arithmetic used by the Reed-Solomon encoders.
//!
//! Both fields used by the supported symbologies are prime fields generated by
//! the element 3: GF(283) for Ultracode and GF(929) for the PDF417 family
//! (PDF417, MicroPDF417 and the GS1 Composite components).

use once_cell::sync::Lazy;

static GF283: Lazy<FieldContext> = Lazy::new(|| FieldContext::new(283, 3));
static GF929: Lazy<FieldContext> = Lazy::new(|| FieldContext::new(929, 3));

/// Log and antilog tables of a prime field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContext {
    modulus: u16,
    primitive_root: u16,
    log: Vec<u16>,
    /// Doubled so that `log[a] + log[b]` can be looked up without a modulo.
    pow: Vec<u16>,
}

impl FieldContext {
    /// Builds the tables of the field of integers modulo `modulus` using
    /// `primitive_root` as generator of the multiplicative group.
    pub fn new(modulus: u16, primitive_root: u16) -> Self {
        assert!(modulus > 2, "modulus must be an odd prime");
        assert!(primitive_root > 1 && primitive_root < modulus, "primitive root must be in 2..modulus");

        let m = modulus as usize;
        let order = m - 1;
        let mut log = vec![0u16; m];
        let mut pow = vec![0u16; 2 * order];

        let mut value = 1usize;
        for j in 0..order {
            assert!(j == 0 || value != 1, "{primitive_root} does not generate GF({modulus})");
            pow[j] = value as u16;
            pow[j + order] = value as u16;
            log[value] = j as u16;
            value = (value * primitive_root as usize) % m;
        }

        Self { modulus, primitive_root, log, pow }
    }

    /// Shared GF(283) context (Ultracode).
    pub fn gf283() -> &'static FieldContext {
        &GF283
    }

    /// Shared GF(929) context (PDF417 family).
    pub fn gf929() -> &'static FieldContext {
        &GF929
    }

    #[inline]
    pub const fn modulus(&self) -> u16 {
        self.modulus
    }

    #[inline]
    pub const fn primitive_root(&self) -> u16 {
        self.primitive_root
    }

    #[inline]
    pub fn mul(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            0
        } else {
            self.pow[self.log[a as usize] as usize + self.log[b as usize] as usize]
        }
    }

    #[inline]
    pub fn add(&self, a: u16, b: u16) -> u16 {
        ((a as u32 + b as u32) % self.modulus as u32) as u16
    }

    #[inline]
    pub fn sub(&self, a: u16, b: u16) -> u16 {
        ((a as u32 + self.modulus as u32 - b as u32) % self.modulus as u32) as u16
    }

    #[inline]
    pub fn neg(&self, a: u16) -> u16 {
        self.sub(0, a)
    }

    /// `primitive_root ^ exponent`
    pub fn power(&self, exponent: usize) -> u16 {
        self.pow[exponent % (self.modulus as usize - 1)]
    }

    /// Discrete logarithm of `x`, `None` for zero.
    pub fn log(&self, x: u16) -> Option<u16> {
        if x == 0 || x >= self.modulus {
            None
        } else {
            Some(self.log[x as usize])
        }
    }
}

/// Divisor polynomial `g(x) = (x - r)(x - r^2)...(x - r^k)`, lowest order
/// coefficient first. The leading coefficient (always 1) is stored last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorPolynomial {
    coefficients: Vec<u16>,
}

impl GeneratorPolynomial {
    pub fn new(field: &FieldContext, ecc_length: usize) -> Self {
        assert!(ecc_length > 0, "at least one check codeword is required");
        let m = field.modulus();

        // Build (x + r)(x + r^2)... then flip the signs of the odd-degree
        // elementary symmetric terms to obtain the (x - r^i) product.
        let mut coefficients = vec![0u16; ecc_length + 1];
        coefficients[0] = 1;
        for i in 0..ecc_length {
            let root = field.power(i + 1);
            for j in (0..=i).rev() {
                coefficients[j + 1] = field.add(coefficients[j], field.mul(coefficients[j + 1], root));
            }
            coefficients[0] = field.mul(coefficients[0], root);
        }
        for i in (0..ecc_length).rev().step_by(2) {
            coefficients[i] = (m - coefficients[i]) % m;
        }

        Self { coefficients }
    }

    #[inline]
    pub fn ecc_length(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn coefficients(&self) -> &[u16] {
        &self.coefficients
    }

    /// Evaluates the polynomial at `x`.
    pub fn eval(&self, field: &FieldContext, x: u16) -> u16 {
        self.coefficients.iter().rev()
            .fold(0, |acc, &c| field.add(field.mul(acc, x), c))
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldContext, GeneratorPolynomial};

    #[test]
    fn test_tables_invert() {
        for field in [FieldContext::gf283(), FieldContext::gf929()] {
            for x in 1..field.modulus() {
                let l = field.log(x).unwrap();
                assert_eq!(field.power(l as usize), x);
            }
            assert_eq!(field.log(0), None);
            assert_eq!(field.power(1), field.primitive_root());
            assert_eq!(field.log(field.primitive_root()), Some(1));
        }
    }

    #[test]
    fn test_mul_identity_and_commutativity() {
        for field in [FieldContext::gf283(), FieldContext::gf929()] {
            let m = field.modulus();
            for a in 0..m {
                assert_eq!(field.mul(a, 1), a);
                assert_eq!(field.mul(a, 0), 0);
            }
            for a in (0..m).step_by(7) {
                for b in (0..m).step_by(11) {
                    assert_eq!(field.mul(a, b), field.mul(b, a));
                    assert_eq!(field.mul(a, b) as u32, (a as u32 * b as u32) % m as u32);
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_non_generator_rejected() {
        // 4 = 2^2 only has order 14 modulo 29
        FieldContext::new(29, 4);
    }

    #[test]
    fn test_generator_gf283_reference() {
        let g = GeneratorPolynomial::new(FieldContext::gf283(), 3);
        assert_eq!(g.coefficients(), &[120, 68, 244, 1]);
        assert_eq!(g.ecc_length(), 3);

        let g = GeneratorPolynomial::new(FieldContext::gf283(), 5);
        assert_eq!(g.coefficients(), &[42, 28, 21, 125, 203, 1]);
    }

    #[test]
    fn test_generator_gf929_reference() {
        // (x - 3)(x - 9) = x^2 - 12x + 27
        let g = GeneratorPolynomial::new(FieldContext::gf929(), 2);
        assert_eq!(g.coefficients(), &[27, 917, 1]);

        let g = GeneratorPolynomial::new(FieldContext::gf929(), 4);
        assert_eq!(&g.coefficients()[..4], &[522, 568, 723, 809]);
    }

    #[test]
    fn test_generator_roots() {
        let field = FieldContext::gf283();
        let g = GeneratorPolynomial::new(field, 17);
        for i in 1..=17 {
            assert_eq!(g.eval(field, field.power(i)), 0);
        }
        assert_ne!(g.eval(field, field.power(18)), 0);
        assert_ne!(g.eval(field, 1), 0);
    }
}
