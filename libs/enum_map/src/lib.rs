use std::{
    fmt::Debug,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// A field-less enum whose variants map onto `0..LEN`.
pub trait Enum: Clone + Sized {
    type Arr: Index<usize, Output = Self> + IntoIterator<Item = Self>;
    const LEN: usize;
    const ALL: Self::Arr;

    fn index(idx: usize) -> Self {
        Self::ALL.index(idx).clone()
    }

    fn to_index(&self) -> usize;
}

/// Dense storage with exactly one slot per variant of `K`.
#[derive(Clone, PartialEq, Eq)]
pub struct EnumMap<K: Enum, V> {
    arr: Vec<V>,
    _marker: PhantomData<K>,
}

impl<K: Enum, V> EnumMap<K, V> {
    pub fn from_fn<F: FnMut(K) -> V>(mut f: F) -> Self {
        Self {
            arr: (0..K::LEN).map(|i| f(K::index(i))).collect(),
            _marker: PhantomData,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.arr.iter().enumerate().map(|(i, v)| (K::index(i), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> {
        self.arr
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (K::index(i), v))
    }

    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.arr.iter()
    }

    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.arr.iter_mut()
    }

    pub fn len(&self) -> usize {
        K::LEN
    }

    pub fn is_empty(&self) -> bool {
        K::LEN == 0
    }
}

impl<K: Enum + Debug, V: Debug> Debug for EnumMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Enum, V: Default> Default for EnumMap<K, V> {
    fn default() -> Self {
        EnumMap::from_fn(|_| V::default())
    }
}

impl<K: Enum, V> Index<&K> for EnumMap<K, V> {
    type Output = V;

    fn index(&self, index: &K) -> &Self::Output {
        &self.arr[index.to_index()]
    }
}

impl<K: Enum, V> IndexMut<&K> for EnumMap<K, V> {
    fn index_mut(&mut self, index: &K) -> &mut Self::Output {
        &mut self.arr[index.to_index()]
    }
}

impl<'a, K: Enum, V> IntoIterator for &'a EnumMap<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.arr.iter()
    }
}

pub use enum_map_derive as macros;
