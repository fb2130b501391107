/// Number of general-purpose registers (`A B C X Y Z I J`).
pub const GENERAL_REGISTER_COUNT: usize = 8;

/// General-purpose register identifier, in operand-encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    A = 0,
    B = 1,
    C = 2,
    X = 3,
    Y = 4,
    Z = 5,
    I = 6,
    J = 7,
}

impl Register {
    /// Ordered list of all general-purpose registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::A,
        Self::B,
        Self::C,
        Self::X,
        Self::Y,
        Self::Z,
        Self::I,
        Self::J,
    ];

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a 3-bit register field.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Option<Self> {
        if bits > 7 {
            return None;
        }
        Some(Self::from_low_bits(bits))
    }

    /// Decodes the low three bits of `bits`, ignoring the rest.
    #[must_use]
    pub const fn from_low_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => Self::A,
            1 => Self::B,
            2 => Self::C,
            3 => Self::X,
            4 => Self::Y,
            5 => Self::Z,
            6 => Self::I,
            _ => Self::J,
        }
    }

    /// Assembly name of the register.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::I => "I",
            Self::J => "J",
        }
    }
}

/// Register file: eight general registers plus `PC`, `SP`, `EX` and `IA`.
///
/// Every register powers on at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    gpr: [u16; GENERAL_REGISTER_COUNT],
    pc: u16,
    sp: u16,
    ex: u16,
    ia: u16,
}

impl RegisterFile {
    /// Reads a general-purpose register.
    #[must_use]
    pub const fn gpr(&self, reg: Register) -> u16 {
        self.gpr[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set_gpr(&mut self, reg: Register, value: u16) {
        self.gpr[reg.index()] = value;
    }

    /// Reads the `PC` register.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the `PC` register.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the `SP` register.
    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.sp
    }

    /// Writes the `SP` register.
    pub const fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    /// Reads the `EX` (overflow/extra) register.
    #[must_use]
    pub const fn ex(&self) -> u16 {
        self.ex
    }

    /// Writes the `EX` register.
    pub const fn set_ex(&mut self, value: u16) {
        self.ex = value;
    }

    /// Reads the `IA` (interrupt address) register.
    #[must_use]
    pub const fn ia(&self) -> u16 {
        self.ia
    }

    /// Writes the `IA` register. Zero disables interrupts.
    pub const fn set_ia(&mut self, value: u16) {
        self.ia = value;
    }
}
