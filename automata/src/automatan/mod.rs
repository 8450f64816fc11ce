pub mod dfa;

/// Bounds and strictness applied while compiling a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_states: usize,
    /// Maximum state name length in bytes.
    pub max_name_len: usize,
    /// Reject final states that were not declared before the acceptance section.
    pub strict_finals: bool,
}

impl Limits {
    pub const DEFAULT: Limits = Limits {
        max_states: 256,
        max_name_len: 64,
        strict_finals: false,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct State(pub(crate) u16);

impl State {
    /// Number of distinct states an index can address.
    pub const MAX_COUNT: usize = u16::MAX as usize + 1;

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A letter of the binary alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Bit {
    #[cfg_attr(feature = "serde", serde(rename = "0"))]
    Zero,
    #[cfg_attr(feature = "serde", serde(rename = "1"))]
    One,
}

impl Bit {
    pub const ALL: [Bit; 2] = [Bit::Zero, Bit::One];

    pub fn from_char(c: char) -> Option<Bit> {
        match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

pub trait Get<Idx> {
    type Output;
    fn get(&self, idx: Idx) -> Option<&Self::Output>;
    fn get_mut(&mut self, idx: Idx) -> Option<&mut Self::Output>;
}

macro_rules! index {
    ($ty: ident, $self:ident, $collection: expr, $index_calc: expr, $index: pat = $index_ty: ty) => {
        impl<T> Get<$index_ty> for $ty<T> {
            type Output = T;
            fn get(&$self, $index: $index_ty) -> Option<&T> {
                $collection.get($index_calc)
            }

            fn get_mut(&mut $self, $index: $index_ty) -> Option<&mut T> {
                $collection.get_mut($index_calc)
            }
        }

        impl<T> std::ops::Index<$index_ty> for $ty<T> {
            type Output = T;

            fn index(&$self, $index: $index_ty) -> &T {
                &$collection[$index_calc]
            }
        }

        impl<T> std::ops::IndexMut<$index_ty> for $ty<T> {
            fn index_mut(&mut $self, $index: $index_ty) -> &mut T {
                &mut $collection[$index_calc]
            }
        }
    };
}

/// Dense per-state table, indexed by [`State`] in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct StateMap<T>(pub(crate) Vec<T>);

index!(StateMap, self, self.0, index.0 as usize, index = State);

impl<T> StateMap<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, value: T) -> State {
        let state = State(self.0.len() as u16);
        self.0.push(value);
        state
    }

    pub fn entries(&self) -> impl Iterator<Item = (State, &T)> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, v)| (State(i as u16), v))
    }
}

impl<T> Default for StateMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-symbol table for the binary alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct BitMap<T>(pub(crate) [T; 2]);

index!(BitMap, self, self.0, index.index(), index = Bit);
