//! The 9-bit opcode space: base opcodes, pseudo-instructions, and super-instructions.
//!
//! A macro-driven table maps each defined value to a name and, for base
//! opcodes, a stack `(inputs, outputs)` pair (§4.4 reuses these directly).
//! This registry carries no function pointers — opcode *execution* is the
//! external `step` dispatcher's job (§6); this module only classifies and
//! names.

mod property_map;

pub use property_map::PropertyMap;

use core::fmt;

/// Number of significant bits in an opcode value. Only the low 9 bits matter.
pub const OPCODE_BITS: u32 = 9;

/// Mask isolating the significant bits of an opcode value.
pub const OPCODE_MASK: u16 = (1u16 << OPCODE_BITS) - 1;

/// Size of the opcode space (`2^9`).
pub const OPCODE_SPACE_SIZE: usize = 1 << OPCODE_BITS;

/// A 9-bit opcode identifier.
///
/// Values `0x00..=0xFF` coincide with base EVM opcodes. Values `0x100..=0x1FF`
/// encode pseudo-instructions and super-instructions. Any two raw values whose
/// low 9 bits agree compare equal: construction always masks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct OpCode(u16);

impl OpCode {
    /// Builds an opcode from a raw value, masking to the significant 9 bits.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw & OPCODE_MASK)
    }

    /// Builds an opcode from a raw value without masking.
    ///
    /// # Safety
    ///
    /// The caller must guarantee `raw & OPCODE_MASK == raw`; violating this
    /// breaks the equality invariant every other method relies on.
    #[inline]
    pub const unsafe fn new_unchecked(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the masked raw value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// True for opcode values below `0x100` — the original single-byte opcodes.
    #[inline]
    pub const fn is_base_instruction(self) -> bool {
        self.0 < 0x100
    }

    /// True if this value decomposes into a fixed sequence of base opcodes.
    #[inline]
    pub fn is_super_instruction(self) -> bool {
        decompose(self).is_some()
    }

    /// Returns the fixed base-opcode expansion of a super-instruction, in
    /// execution order, or `None` for base opcodes and pseudo-instructions.
    #[inline]
    pub fn decompose(self) -> Option<&'static [OpCode]> {
        decompose(self)
    }

    /// True for `PUSH1..PUSH32`, `DATA`, `JUMP_TO`, or a super-instruction
    /// whose decomposition contains one of those.
    #[inline]
    pub fn has_argument(self) -> bool {
        has_argument(self)
    }

    /// Canonical mnemonic, or `op(0xHHHH)` for an unmapped value.
    pub fn name(self) -> alloc_free_string::Name {
        let base_name = if self.is_base_instruction() {
            BASE_NAMES[self.0 as usize]
        } else {
            None
        };
        if let Some(name) = base_name {
            alloc_free_string::Name::Static(name)
        } else if let Some(name) = PSEUDO_SUPER_NAMES[self.0 as usize] {
            alloc_free_string::Name::Static(name)
        } else {
            alloc_free_string::Name::Unknown(self.0)
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.name(), f)
    }
}

/// A tiny non-allocating `Display` wrapper so `OpCode::name` doesn't need
/// `alloc` just to format the `op(0xHHHH)` fallback.
mod alloc_free_string {
    use core::fmt;

    pub enum Name {
        Static(&'static str),
        Unknown(u16),
    }

    impl fmt::Display for Name {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Name::Static(s) => f.write_str(s),
                Name::Unknown(v) => write!(f, "op(0x{v:04X})"),
            }
        }
    }
}

/// Stack-effect input/output counts for a base opcode, as used by §4.4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCodeInfo {
    pub name: &'static str,
    pub inputs: u8,
    pub outputs: u8,
    /// `false` for `INVALID` and any other non-executable base opcode.
    pub executable: bool,
}

macro_rules! base_opcodes {
    ($($val:literal => $name:ident => $inputs:literal, $outputs:literal $(, $flag:ident)?);* $(;)?) => {
        $(
            #[doc = concat!("The `0x", stringify!($val), "` (\"", stringify!($name), "\") base opcode.")]
            pub const $name: u16 = $val;
        )*

        const BASE_NAMES: [Option<&'static str>; 256] = {
            let mut names = [None; 256];
            $( names[$val] = Some(stringify!($name)); )*
            names
        };

        const BASE_INFO: [Option<OpCodeInfo>; 256] = {
            let mut info = [None; 256];
            $(
                info[$val] = Some(OpCodeInfo {
                    name: stringify!($name),
                    inputs: $inputs,
                    outputs: $outputs,
                    executable: true $(&& base_opcodes!(@flag $flag))?,
                });
            )*
            info
        };
    };
    (@flag not_executable) => { false };
}

base_opcodes! {
    0x00 => STOP => 0, 0;
    0x01 => ADD => 2, 1;
    0x02 => MUL => 2, 1;
    0x03 => SUB => 2, 1;
    0x04 => DIV => 2, 1;
    0x05 => SDIV => 2, 1;
    0x06 => MOD => 2, 1;
    0x07 => SMOD => 2, 1;
    0x08 => ADDMOD => 3, 1;
    0x09 => MULMOD => 3, 1;
    0x0A => EXP => 2, 1;
    0x0B => SIGNEXTEND => 2, 1;
    0x10 => LT => 2, 1;
    0x11 => GT => 2, 1;
    0x12 => SLT => 2, 1;
    0x13 => SGT => 2, 1;
    0x14 => EQ => 2, 1;
    0x15 => ISZERO => 1, 1;
    0x16 => AND => 2, 1;
    0x17 => OR => 2, 1;
    0x18 => XOR => 2, 1;
    0x19 => NOT => 1, 1;
    0x1A => BYTE => 2, 1;
    0x1B => SHL => 2, 1;
    0x1C => SHR => 2, 1;
    0x1D => SAR => 2, 1;
    0x20 => SHA3 => 2, 1;
    0x30 => ADDRESS => 0, 1;
    0x31 => BALANCE => 1, 1;
    0x32 => ORIGIN => 0, 1;
    0x33 => CALLER => 0, 1;
    0x34 => CALLVALUE => 0, 1;
    0x35 => CALLDATALOAD => 1, 1;
    0x36 => CALLDATASIZE => 0, 1;
    0x37 => CALLDATACOPY => 3, 0;
    0x38 => CODESIZE => 0, 1;
    0x39 => CODECOPY => 3, 0;
    0x3A => GASPRICE => 0, 1;
    0x3B => EXTCODESIZE => 1, 1;
    0x3C => EXTCODECOPY => 4, 0;
    0x3D => RETURNDATASIZE => 0, 1;
    0x3E => RETURNDATACOPY => 3, 0;
    0x3F => EXTCODEHASH => 1, 1;
    0x40 => BLOCKHASH => 1, 1;
    0x41 => COINBASE => 0, 1;
    0x42 => TIMESTAMP => 0, 1;
    0x43 => NUMBER => 0, 1;
    0x44 => PREVRANDAO => 0, 1;
    0x45 => GASLIMIT => 0, 1;
    0x46 => CHAINID => 0, 1;
    0x47 => SELFBALANCE => 0, 1;
    0x48 => BASEFEE => 0, 1;
    0x49 => BLOBHASH => 1, 1;
    0x4A => BLOBBASEFEE => 0, 1;
    0x50 => POP => 1, 0;
    0x51 => MLOAD => 1, 1;
    0x52 => MSTORE => 2, 0;
    0x53 => MSTORE8 => 2, 0;
    0x54 => SLOAD => 1, 1;
    0x55 => SSTORE => 2, 0;
    0x56 => JUMP => 1, 0;
    0x57 => JUMPI => 2, 0;
    0x58 => PC => 0, 1;
    0x59 => MSIZE => 0, 1;
    0x5A => GAS => 0, 1;
    0x5B => JUMPDEST => 0, 0;
    0x5C => TLOAD => 1, 1;
    0x5D => TSTORE => 2, 0;
    0x5E => MCOPY => 3, 0;
    0x5F => PUSH0 => 0, 1;
    0x60 => PUSH1 => 0, 1;
    0x61 => PUSH2 => 0, 1;
    0x62 => PUSH3 => 0, 1;
    0x63 => PUSH4 => 0, 1;
    0x64 => PUSH5 => 0, 1;
    0x65 => PUSH6 => 0, 1;
    0x66 => PUSH7 => 0, 1;
    0x67 => PUSH8 => 0, 1;
    0x68 => PUSH9 => 0, 1;
    0x69 => PUSH10 => 0, 1;
    0x6A => PUSH11 => 0, 1;
    0x6B => PUSH12 => 0, 1;
    0x6C => PUSH13 => 0, 1;
    0x6D => PUSH14 => 0, 1;
    0x6E => PUSH15 => 0, 1;
    0x6F => PUSH16 => 0, 1;
    0x70 => PUSH17 => 0, 1;
    0x71 => PUSH18 => 0, 1;
    0x72 => PUSH19 => 0, 1;
    0x73 => PUSH20 => 0, 1;
    0x74 => PUSH21 => 0, 1;
    0x75 => PUSH22 => 0, 1;
    0x76 => PUSH23 => 0, 1;
    0x77 => PUSH24 => 0, 1;
    0x78 => PUSH25 => 0, 1;
    0x79 => PUSH26 => 0, 1;
    0x7A => PUSH27 => 0, 1;
    0x7B => PUSH28 => 0, 1;
    0x7C => PUSH29 => 0, 1;
    0x7D => PUSH30 => 0, 1;
    0x7E => PUSH31 => 0, 1;
    0x7F => PUSH32 => 0, 1;
    0x80 => DUP1 => 1, 2;
    0x81 => DUP2 => 2, 3;
    0x82 => DUP3 => 3, 4;
    0x83 => DUP4 => 4, 5;
    0x84 => DUP5 => 5, 6;
    0x85 => DUP6 => 6, 7;
    0x86 => DUP7 => 7, 8;
    0x87 => DUP8 => 8, 9;
    0x88 => DUP9 => 9, 10;
    0x89 => DUP10 => 10, 11;
    0x8A => DUP11 => 11, 12;
    0x8B => DUP12 => 12, 13;
    0x8C => DUP13 => 13, 14;
    0x8D => DUP14 => 14, 15;
    0x8E => DUP15 => 15, 16;
    0x8F => DUP16 => 16, 17;
    0x90 => SWAP1 => 2, 2;
    0x91 => SWAP2 => 3, 3;
    0x92 => SWAP3 => 4, 4;
    0x93 => SWAP4 => 5, 5;
    0x94 => SWAP5 => 6, 6;
    0x95 => SWAP6 => 7, 7;
    0x96 => SWAP7 => 8, 8;
    0x97 => SWAP8 => 9, 9;
    0x98 => SWAP9 => 10, 10;
    0x99 => SWAP10 => 11, 11;
    0x9A => SWAP11 => 12, 12;
    0x9B => SWAP12 => 13, 13;
    0x9C => SWAP13 => 14, 14;
    0x9D => SWAP14 => 15, 15;
    0x9E => SWAP15 => 16, 16;
    0x9F => SWAP16 => 17, 17;
    0xA0 => LOG0 => 2, 0;
    0xA1 => LOG1 => 3, 0;
    0xA2 => LOG2 => 4, 0;
    0xA3 => LOG3 => 5, 0;
    0xA4 => LOG4 => 6, 0;
    0xF0 => CREATE => 3, 1;
    0xF1 => CALL => 7, 1;
    0xF2 => CALLCODE => 7, 1;
    0xF3 => RETURN => 2, 0;
    0xF4 => DELEGATECALL => 6, 1;
    0xF5 => CREATE2 => 4, 1;
    0xFA => STATICCALL => 6, 1;
    0xFD => REVERT => 2, 0;
    0xFE => INVALID => 0, 0, not_executable;
    0xFF => SELFDESTRUCT => 1, 0;
}

/// Returns the per-base-opcode `(inputs, outputs, executable)` info, if defined.
#[inline]
pub const fn base_info(raw_byte: u8) -> Option<OpCodeInfo> {
    BASE_INFO[raw_byte as usize]
}

// --- pseudo-instructions ---

/// Jump target rewritten by the long-form converter: `arg` is the bytecode-space
/// index of the target `JUMPDEST`.
pub const JUMP_TO: u16 = 0x100;
/// Filler inserted by the converter after a `JUMP_TO` and over skipped bytes.
pub const NOOP: u16 = 0x101;
/// 16 extra bits of constant data extending a preceding `PUSH_n`.
pub const DATA: u16 = 0x102;

// --- super-instructions ---

pub const SWAP2_SWAP1_POP_JUMP: u16 = 0x103;
pub const SWAP1_POP_SWAP2_SWAP1: u16 = 0x104;
pub const POP_SWAP2_SWAP1_POP: u16 = 0x105;
pub const POP_POP: u16 = 0x106;
pub const PUSH1_SHL: u16 = 0x107;
pub const PUSH1_ADD: u16 = 0x108;
pub const PUSH1_DUP1: u16 = 0x109;
pub const PUSH2_JUMP: u16 = 0x10A;
pub const PUSH2_JUMPI: u16 = 0x10B;
pub const PUSH1_PUSH1: u16 = 0x10C;
pub const SWAP1_POP: u16 = 0x10D;
pub const POP_JUMP: u16 = 0x10E;
pub const SWAP2_SWAP1: u16 = 0x10F;
pub const SWAP2_POP: u16 = 0x110;
pub const DUP2_MSTORE: u16 = 0x111;
pub const DUP2_LT: u16 = 0x112;
pub const ISZERO_PUSH2_JUMPI: u16 = 0x113;
pub const PUSH1_PUSH4_DUP3: u16 = 0x114;
pub const AND_SWAP1_POP_SWAP2_SWAP1: u16 = 0x115;
pub const PUSH1_PUSH1_PUSH1_SHL_SUB: u16 = 0x116;

/// The highest opcode value defined anywhere in the registry.
///
/// Testable invariant (§3): `HIGHEST_OPCODE & OPCODE_MASK == HIGHEST_OPCODE`.
pub const HIGHEST_OPCODE: u16 = PUSH1_PUSH1_PUSH1_SHL_SUB;

macro_rules! pseudo_super_names {
    ($($val:expr => $name:literal);* $(;)?) => {
        const PSEUDO_SUPER_NAMES: [Option<&'static str>; OPCODE_SPACE_SIZE] = {
            let mut names = [None; OPCODE_SPACE_SIZE];
            $( names[$val as usize] = Some($name); )*
            names
        };
    };
}

pseudo_super_names! {
    JUMP_TO => "JUMP_TO";
    NOOP => "NOOP";
    DATA => "DATA";
    SWAP2_SWAP1_POP_JUMP => "SWAP2_SWAP1_POP_JUMP";
    SWAP1_POP_SWAP2_SWAP1 => "SWAP1_POP_SWAP2_SWAP1";
    POP_SWAP2_SWAP1_POP => "POP_SWAP2_SWAP1_POP";
    POP_POP => "POP_POP";
    PUSH1_SHL => "PUSH1_SHL";
    PUSH1_ADD => "PUSH1_ADD";
    PUSH1_DUP1 => "PUSH1_DUP1";
    PUSH2_JUMP => "PUSH2_JUMP";
    PUSH2_JUMPI => "PUSH2_JUMPI";
    PUSH1_PUSH1 => "PUSH1_PUSH1";
    SWAP1_POP => "SWAP1_POP";
    POP_JUMP => "POP_JUMP";
    SWAP2_SWAP1 => "SWAP2_SWAP1";
    SWAP2_POP => "SWAP2_POP";
    DUP2_MSTORE => "DUP2_MSTORE";
    DUP2_LT => "DUP2_LT";
    ISZERO_PUSH2_JUMPI => "ISZERO_PUSH2_JUMPI";
    PUSH1_PUSH4_DUP3 => "PUSH1_PUSH4_DUP3";
    AND_SWAP1_POP_SWAP2_SWAP1 => "AND_SWAP1_POP_SWAP2_SWAP1";
    PUSH1_PUSH1_PUSH1_SHL_SUB => "PUSH1_PUSH1_PUSH1_SHL_SUB";
}

macro_rules! base_seq {
    ($($name:ident),* $(,)?) => {
        &[$(OpCode($name)),*]
    };
}

/// Returns the fixed base-opcode expansion of a super-instruction.
fn decompose(op: OpCode) -> Option<&'static [OpCode]> {
    match op.0 {
        SWAP2_SWAP1_POP_JUMP => Some(base_seq![SWAP2, SWAP1, POP, JUMP]),
        SWAP1_POP_SWAP2_SWAP1 => Some(base_seq![SWAP1, POP, SWAP2, SWAP1]),
        POP_SWAP2_SWAP1_POP => Some(base_seq![POP, SWAP2, SWAP1, POP]),
        POP_POP => Some(base_seq![POP, POP]),
        PUSH1_SHL => Some(base_seq![PUSH1, SHL]),
        PUSH1_ADD => Some(base_seq![PUSH1, ADD]),
        PUSH1_DUP1 => Some(base_seq![PUSH1, DUP1]),
        PUSH2_JUMP => Some(base_seq![PUSH2, JUMP]),
        PUSH2_JUMPI => Some(base_seq![PUSH2, JUMPI]),
        PUSH1_PUSH1 => Some(base_seq![PUSH1, PUSH1]),
        SWAP1_POP => Some(base_seq![SWAP1, POP]),
        POP_JUMP => Some(base_seq![POP, JUMP]),
        SWAP2_SWAP1 => Some(base_seq![SWAP2, SWAP1]),
        SWAP2_POP => Some(base_seq![SWAP2, POP]),
        DUP2_MSTORE => Some(base_seq![DUP2, MSTORE]),
        DUP2_LT => Some(base_seq![DUP2, LT]),
        ISZERO_PUSH2_JUMPI => Some(base_seq![ISZERO, PUSH2, JUMPI]),
        PUSH1_PUSH4_DUP3 => Some(base_seq![PUSH1, PUSH4, DUP3]),
        AND_SWAP1_POP_SWAP2_SWAP1 => Some(base_seq![AND, SWAP1, POP, SWAP2, SWAP1]),
        PUSH1_PUSH1_PUSH1_SHL_SUB => Some(base_seq![PUSH1, PUSH1, PUSH1, SHL, SUB]),
        _ => None,
    }
}

fn has_argument(op: OpCode) -> bool {
    match op.0 {
        v if (PUSH1..=PUSH32).contains(&v) => true,
        DATA | JUMP_TO => true,
        _ => {
            if let Some(components) = decompose(op) {
                components.iter().any(|&c| has_argument(c))
            } else {
                false
            }
        }
    }
}
