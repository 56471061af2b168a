//! Mathematical constants, precomputed to 39 limbs (2496 bits).
//!
//! Each table holds the mantissa most-significant-limb first; narrower
//! mantissas take a rounded prefix through `set_from_table`, wider ones
//! pad with zeros.

use crate::int::Int;
use crate::words::Word;

use super::Big;

pub(crate) const PI_MANTISSA: [Word; 39] = [
    0xc90fdaa22168c234, 0xc4c6628b80dc1cd1, 0x29024e088a67cc74, 0x020bbea63b139b22,
    0x514a08798e3404dd, 0xef9519b3cd3a431b, 0x302b0a6df25f1437, 0x4fe1356d6d51c245,
    0xe485b576625e7ec6, 0xf44c42e9a637ed6b, 0x0bff5cb6f406b7ed, 0xee386bfb5a899fa5,
    0xae9f24117c4b1fe6, 0x49286651ece45b3d, 0xc2007cb8a163bf05, 0x98da48361c55d39a,
    0x69163fa8fd24cf5f, 0x83655d23dca3ad96, 0x1c62f356208552bb, 0x9ed529077096966d,
    0x670c354e4abc9804, 0xf1746c08ca18217c, 0x32905e462e36ce3b, 0xe39e772c180e8603,
    0x9b2783a2ec07a28f, 0xb5c55df06f4c52c9, 0xde2bcbf695581718, 0x3995497cea956ae5,
    0x15d2261898fa0510, 0x15728e5a8aaac42d, 0xad33170d04507a33, 0xa85521abdf1cba64,
    0xecfb850458dbef0a, 0x8aea71575d060c7d, 0xb3970f85a6e1e4c7, 0xabf5ae8cdb0933d7,
    0x1e8c94e04a25619d, 0xcee3d2261ad2ee6b, 0xf0139f9d88e637cb,
];

pub(crate) const E_MANTISSA: [Word; 39] = [
    0xadf85458a2bb4a9a, 0xafdc5620273d3cf1, 0xd8b9c583ce2d3695, 0xa9e13641146433fb,
    0xcc939dce249b3ef9, 0x7d2fe363630c75d8, 0xf681b202aec4617a, 0xd3df1ed5d5fd6561,
    0x2433f51f5f066ed0, 0x856365553ded1af3, 0xb557135e7f57c935, 0x984f0c70e0e68b77,
    0xe2a689daf3efe872, 0x1df158a136ade735, 0x30acca4f483a797a, 0xbc0ab182b324fb61,
    0xd108a94bb2c8e3fb, 0xb96adab760d7f468, 0x1d4f42a3de394df4, 0xae56ede76372bb19,
    0x0b07a7c8ee0a6d70, 0x9e02fce1cdf7e2ec, 0xc03404cd28342f61, 0x9172fe9ce98583ff,
    0x8e4f1232eef28183, 0xc3fe3b1b4c6fad73, 0x3bb5fcbc2ec22005, 0xc58ef1837d1683b2,
    0xc6f34a26c1b2effa, 0x886b4238611fcfdc, 0xde355b3b6519035b, 0xbc34f4def99c0238,
    0x61b46fc9d6e6c907, 0x7ad91d2691f7f7ee, 0x598cb0fac186d91c, 0xaefe130985139270,
    0xb4130c93bc437944, 0xf4fd4452e2d74dd3, 0x645b219441468794,
];

pub(crate) const LN2_MANTISSA: [Word; 39] = [
    0xb17217f7d1cf79ab, 0xc9e3b39803f2f6af, 0x40f343267298b62d, 0x8a0d175b8baafa2b,
    0xe7b876206debac98, 0x559552fb4afa1b10, 0xed2eae35c1382144, 0x27573b291169b825,
    0x3e96ca16224ae8c5, 0x1acbda11317c387e, 0xb9ea9bc3b136603b, 0x256fa0ec7657f74b,
    0x72ce87b19d6548ca, 0xf5dfa6bd38303248, 0x655fa1872f20e3a2, 0xda2d97c50f3fd5c6,
    0x07f4ca11fb5bfb90, 0x610d30f88fe551a2, 0xee569d6dfc1efa15, 0x7d2e23de1400b396,
    0x17460775db8990e5, 0xc943e732b479cd33, 0xcccc4e659393514c, 0x4c1a1e0bd1d6095d,
    0x25669b333564a337, 0x6a9c7f8a5e148e82, 0x074db6015cfe7aa3, 0x0c480a5417350d2c,
    0x955d5179b1e17b9d, 0xae313cdb6c606cb1, 0x078f735d1b2db31b, 0x5f50b5185064c18b,
    0x4d162db3b365853d, 0x7598a1951ae273ee, 0x5570b6c68f969834, 0x96d4e6d330af889b,
    0x44a02554731cdc8e, 0xa17293d1228a4ef8, 0x6e1adf8408689fa8,
];

impl<const E: usize, const M: usize> Big<E, M> {
    /// Sets the value pi.
    pub fn set_pi(&mut self) {
        self.mantissa.set_from_table(&PI_MANTISSA);
        self.exponent = Int::from_i64(-(Self::MANTISSA_BITS as i64) + 2);
        self.sign = false;
    }

    /// Sets the value pi/2.
    pub fn set_half_pi(&mut self) {
        self.set_pi();
        self.exponent.sub_one();
    }

    /// Sets the value 2*pi.
    pub fn set_two_pi(&mut self) {
        self.set_pi();
        self.exponent.add_one();
    }

    /// Sets the base of the natural logarithm.
    pub fn set_e(&mut self) {
        self.mantissa.set_from_table(&E_MANTISSA);
        self.exponent = Int::from_i64(-(Self::MANTISSA_BITS as i64) + 2);
        self.sign = false;
    }

    /// Sets ln(2).
    pub fn set_ln2(&mut self) {
        self.mantissa.set_from_table(&LN2_MANTISSA);
        self.exponent = Int::from_i64(-(Self::MANTISSA_BITS as i64));
        self.sign = false;
    }
}
