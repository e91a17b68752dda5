//! Instruction set.
use core::fmt;

/// read macro or code bellow.
///
/// ```ignore
/// impl_instructions! {
///     pub enum Foo {
///         /// Doc of variant, returned by `incode_doc`
///         Bar = b'>' as "bar",
///     }
/// }
///
/// assert_eq!(Foo::from_byte(b'>'), Some(Foo::Bar));
/// assert_eq!(Foo::Bar.symbol(), '>');
/// assert_eq!(Foo::Bar.name(), "bar");
/// ```
macro_rules! impl_instructions {
    ($(#[$m:meta])* $v:vis enum $name:ident { $($(#[doc = $doc:literal])* $var:ident = $sym:literal as $lname:literal),* $(,)? }) => {
        $(#[$m])*
        #[repr(u8)]
        $v enum $name {$(
            $(#[doc = $doc])* $var = $sym,
        )*}

        impl $name {
            /// Array of all variants.
            pub const VARIANTS: &[$name] = &[$(Self::$var, )*];

            /// Decodes a program byte. Returns [`None`] for bytes outside the
            /// instruction set, which are executed as no-ops.
            pub const fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($sym => Some(Self::$var),)*
                    _ => None,
                }
            }

            /// Get source character of variant.
            pub const fn symbol(self) -> char {
                self as u8 as char
            }

            /// Get name of variant.
            pub const fn name(self) -> &'static str {
                match self {$(
                    Self::$var => $lname,
                )*}
            }

            /// Get documentation for variant.
            ///
            /// *Note*: provided documentation is IN-CODE documentation, like that
            /// you type in `///`.
            pub const fn incode_doc(self) -> &'static str {
                match self {$(
                    Self::$var => concat!($($doc, "\n", )*),
                )*}
            }
        }
    };
}

impl_instructions! {
    /// Represents one instruction of the language. Obtained from a program byte
    /// using [`Instruction::from_byte`].
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub enum Instruction {
        /// Move data pointer one cell to the right
        IncPtr = b'>' as "incptr",
        /// Move data pointer one cell to the left. Fails on cell 0
        DecPtr = b'<' as "decptr",
        /// Increment current cell
        IncCell = b'+' as "inccell",
        /// Decrement current cell
        DecCell = b'-' as "deccell",
        /// Write current cell to output as a character
        Output = b'.' as "output",
        /// Read a character into current cell. Not yet functional
        Input = b',' as "input",
        /// Jump past matching `]` if current cell is zero
        LoopOpen = b'[' as "loopopen",
        /// Jump back to matching `[` if current cell is nonzero
        LoopClose = b']' as "loopclose",
    }
}

impl Instruction {
    /// Returns `true` for `[` and `]`.
    #[inline(always)]
    pub fn is_bracket(self) -> bool {
        matches!(self, Self::LoopOpen | Self::LoopClose)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
