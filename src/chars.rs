//! Character classification for the JavaScript scanner
//!
//! ASCII characters are classified through a compile-time lookup table;
//! everything above U+007F goes through the Unicode helpers at the bottom
//! of this module.

/// Bitfield flags for character classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// Intra-line whitespace (space, tab, vertical tab, form feed)
    pub const WHITESPACE: Self = Self(1 << 0);
    /// Characters that can start an identifier
    pub const ID_START: Self = Self(1 << 1);
    /// Characters that can continue an identifier
    pub const ID_PART: Self = Self(1 << 2);
    /// Decimal digits
    pub const DIGIT: Self = Self(1 << 3);
    /// Hexadecimal digits
    pub const HEX_DIGIT: Self = Self(1 << 4);
    /// Octal digits
    pub const OCTAL_DIGIT: Self = Self(1 << 5);
    /// Binary digits
    pub const BINARY_DIGIT: Self = Self(1 << 6);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Checks if all of the given flags are set
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no flags are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CharacterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Character lookup table for O(1) ASCII classification
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 128]);

impl CharacterTable {
    /// Creates a new character table with compile-time initialization
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 128];
        let mut i = 0;

        while i < 128 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            if matches!(ch, b' ' | b'\t' | 0x0B | 0x0C) {
                flags = flags.union(CharacterFlags::WHITESPACE);
            }

            match ch {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => {
                    flags = flags.union(CharacterFlags::ID_START);
                    flags = flags.union(CharacterFlags::ID_PART);
                }
                b'0'..=b'9' => {
                    flags = flags.union(CharacterFlags::ID_PART);
                    flags = flags.union(CharacterFlags::DIGIT);
                    flags = flags.union(CharacterFlags::HEX_DIGIT);
                }
                _ => {}
            }

            match ch {
                b'a'..=b'f' | b'A'..=b'F' => flags = flags.union(CharacterFlags::HEX_DIGIT),
                _ => {}
            }

            match ch {
                b'0'..=b'7' => flags = flags.union(CharacterFlags::OCTAL_DIGIT),
                _ => {}
            }

            match ch {
                b'0' | b'1' => flags = flags.union(CharacterFlags::BINARY_DIGIT),
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Returns the flags for a character; non-ASCII characters have none
    #[inline(always)]
    pub fn get_flags(&self, ch: char) -> CharacterFlags {
        if ch.is_ascii() {
            self.0[ch as usize]
        } else {
            CharacterFlags::empty()
        }
    }

    /// Tests if a character has any of the given flags
    #[inline(always)]
    pub fn test_character(&self, ch: char, flags: CharacterFlags) -> bool {
        self.get_flags(ch).intersects(flags)
    }

    #[inline(always)]
    pub fn is_digit(&self, ch: char) -> bool {
        self.test_character(ch, CharacterFlags::DIGIT)
    }

    #[inline(always)]
    pub fn is_hex_digit(&self, ch: char) -> bool {
        self.test_character(ch, CharacterFlags::HEX_DIGIT)
    }

    #[inline(always)]
    pub fn is_octal_digit(&self, ch: char) -> bool {
        self.test_character(ch, CharacterFlags::OCTAL_DIGIT)
    }

    #[inline(always)]
    pub fn is_binary_digit(&self, ch: char) -> bool {
        self.test_character(ch, CharacterFlags::BINARY_DIGIT)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();

/// Byte order mark; treated as whitespace, never skipped as a format character
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Checks for JavaScript whitespace other than line terminators
pub fn is_js_space(ch: char) -> bool {
    if ch.is_ascii() {
        return CHARACTER_TABLE.test_character(ch, CharacterFlags::WHITESPACE);
    }
    ch == '\u{A0}' || ch == BYTE_ORDER_MARK || is_space_separator(ch)
}

/// Unicode general category Zs
fn is_space_separator(ch: char) -> bool {
    matches!(
        ch,
        '\u{20}' | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Unicode general category Cf, restricted to non-ASCII characters
///
/// The byte order mark is a format character too; callers that treat it as
/// whitespace must check for it first.
pub fn is_format_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{AD}'
            | '\u{600}'..='\u{605}'
            | '\u{61C}'
            | '\u{6DD}'
            | '\u{70F}'
            | '\u{890}'..='\u{891}'
            | '\u{8E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

/// Line terminators that are not plain ASCII `\n`/`\r`
pub fn is_unicode_line_terminator(ch: char) -> bool {
    matches!(ch, '\u{2028}' | '\u{2029}')
}

/// Checks if a character can start an identifier
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        return CHARACTER_TABLE.test_character(ch, CharacterFlags::ID_START);
    }
    unicode_ident::is_xid_start(ch) || is_currency_symbol(ch)
}

/// Checks if a character can continue an identifier
pub fn is_identifier_part(ch: char) -> bool {
    if ch.is_ascii() {
        return CHARACTER_TABLE.test_character(ch, CharacterFlags::ID_PART);
    }
    if ch == BYTE_ORDER_MARK {
        return false;
    }
    unicode_ident::is_xid_continue(ch)
        || is_currency_symbol(ch)
        || matches!(ch, '\u{200C}' | '\u{200D}')
}

/// Currency symbols outside ASCII are legal in identifiers for the legacy
/// engines this scanner mirrors
fn is_currency_symbol(ch: char) -> bool {
    matches!(ch, '\u{A2}'..='\u{A5}' | '\u{20A0}'..='\u{20C0}')
}

/// Checks if a character is a digit in the given base
pub fn is_digit_in_base(base: u32, ch: char) -> bool {
    match base {
        10 => CHARACTER_TABLE.is_digit(ch),
        16 => CHARACTER_TABLE.is_hex_digit(ch),
        8 => CHARACTER_TABLE.is_octal_digit(ch),
        2 => CHARACTER_TABLE.is_binary_digit(ch),
        _ => false,
    }
}

/// Folds one more hex digit into `accumulator`, or returns `None` if `ch`
/// is not a hex digit
pub fn accumulate_hex_digit(ch: Option<char>, accumulator: u32) -> Option<u32> {
    let digit = ch?.to_digit(16)?;
    Some((accumulator << 4) | digit)
}
