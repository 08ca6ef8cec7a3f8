//! Stable symbols for the built-in scalar/generic type names and `Tuple`,
//! interned once per analysis so expression inference can build [`TypeRef`]
//! values without needing source text to have mentioned them literally.

use crate::intern::{Interner, Symbol};
use crate::types::{NumericWidth, TUPLE_NAME};

pub struct BuiltinSymbols {
    pub bool_: Symbol,
    pub address: Symbol,
    pub widths: [Symbol; 6],
    pub tuple: Symbol,
}

impl BuiltinSymbols {
    pub fn new(interner: &mut Interner) -> Self {
        let widths = NumericWidth::LADDER.map(|w| interner.intern(w.name()));
        Self { bool_: interner.intern("Bool"), address: interner.intern("Address"), widths, tuple: interner.intern(TUPLE_NAME) }
    }

    pub fn width_symbol(&self, width: NumericWidth) -> Symbol {
        self.widths[width as usize]
    }
}
