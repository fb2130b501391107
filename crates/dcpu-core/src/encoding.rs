/// Basic (two-operand) opcodes, keyed by the low nibble of the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum BasicOpcode {
    Set = 0x1,
    Add = 0x2,
    Sub = 0x3,
    Mul = 0x4,
    Div = 0x5,
    Mod = 0x6,
    Shl = 0x7,
    Shr = 0x8,
    And = 0x9,
    Bor = 0xA,
    Xor = 0xB,
    Ife = 0xC,
    Ifn = 0xD,
    Ifg = 0xE,
    Ifb = 0xF,
}

impl BasicOpcode {
    /// Encoded 4-bit opcode value.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::Shl => "SHL",
            Self::Shr => "SHR",
            Self::And => "AND",
            Self::Bor => "BOR",
            Self::Xor => "XOR",
            Self::Ife => "IFE",
            Self::Ifn => "IFN",
            Self::Ifg => "IFG",
            Self::Ifb => "IFB",
        }
    }

    /// Conditionals only read their operands and arm the skip flag.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::Ife | Self::Ifn | Self::Ifg | Self::Ifb)
    }

    /// Opcodes that read the destination before writing it back.
    #[must_use]
    pub const fn is_read_modify_write(self) -> bool {
        !matches!(self, Self::Set) && !self.is_conditional()
    }
}

/// Extended (single-operand) opcodes, selected by bits 4..9 when the low nibble is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ExtendedOpcode {
    Jsr = 0x01,
    Int = 0x08,
    Iag = 0x09,
    Ias = 0x0A,
    Rfi = 0x0B,
    Iaq = 0x0C,
    Hwn = 0x10,
    Hwq = 0x11,
    Hwi = 0x12,
}

impl ExtendedOpcode {
    /// Encoded 6-bit opcode value.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Jsr => "JSR",
            Self::Int => "INT",
            Self::Iag => "IAG",
            Self::Ias => "IAS",
            Self::Rfi => "RFI",
            Self::Iaq => "IAQ",
            Self::Hwn => "HWN",
            Self::Hwq => "HWQ",
            Self::Hwi => "HWI",
        }
    }
}

/// Single source-of-truth basic opcode table.
pub const BASIC_OPCODE_TABLE: &[(u8, BasicOpcode)] = &[
    (0x1, BasicOpcode::Set),
    (0x2, BasicOpcode::Add),
    (0x3, BasicOpcode::Sub),
    (0x4, BasicOpcode::Mul),
    (0x5, BasicOpcode::Div),
    (0x6, BasicOpcode::Mod),
    (0x7, BasicOpcode::Shl),
    (0x8, BasicOpcode::Shr),
    (0x9, BasicOpcode::And),
    (0xA, BasicOpcode::Bor),
    (0xB, BasicOpcode::Xor),
    (0xC, BasicOpcode::Ife),
    (0xD, BasicOpcode::Ifn),
    (0xE, BasicOpcode::Ifg),
    (0xF, BasicOpcode::Ifb),
];

/// Single source-of-truth extended opcode table.
///
/// Any extended code not present here is reserved and executes as a no-op.
pub const EXTENDED_OPCODE_TABLE: &[(u8, ExtendedOpcode)] = &[
    (0x01, ExtendedOpcode::Jsr),
    (0x08, ExtendedOpcode::Int),
    (0x09, ExtendedOpcode::Iag),
    (0x0A, ExtendedOpcode::Ias),
    (0x0B, ExtendedOpcode::Rfi),
    (0x0C, ExtendedOpcode::Iaq),
    (0x10, ExtendedOpcode::Hwn),
    (0x11, ExtendedOpcode::Hwq),
    (0x12, ExtendedOpcode::Hwi),
];

/// Returns the basic opcode for a 4-bit opcode field.
///
/// `None` for zero, which selects the extended form.
#[must_use]
pub fn classify_basic_opcode(code: u8) -> Option<BasicOpcode> {
    BASIC_OPCODE_TABLE
        .iter()
        .find_map(|(entry, opcode)| (*entry == code).then_some(*opcode))
}

/// Returns the extended opcode for a 6-bit code, or `None` when reserved.
#[must_use]
pub fn classify_extended_opcode(code: u8) -> Option<ExtendedOpcode> {
    EXTENDED_OPCODE_TABLE
        .iter()
        .find_map(|(entry, opcode)| (*entry == code).then_some(*opcode))
}

/// Splits an instruction word `aaaaaabbbbbboooo` into its `(o, b, a)` fields.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn split_instruction_word(word: u16) -> (u8, u8, u8) {
    (
        (word & 0x000F) as u8,
        ((word >> 4) & 0x003F) as u8,
        ((word >> 10) & 0x003F) as u8,
    )
}

/// Packs `(o, b, a)` fields into an instruction word. Oversized fields are masked.
#[must_use]
pub const fn pack_instruction_word(o: u8, b: u8, a: u8) -> u16 {
    ((a as u16 & 0x3F) << 10) | ((b as u16 & 0x3F) << 4) | (o as u16 & 0x0F)
}
