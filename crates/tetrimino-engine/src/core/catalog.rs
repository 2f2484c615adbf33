use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

use super::{
    geometry::Point,
    piece::{Piece, PieceId},
};

/// Enum representing the identity of a tetrimino shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[repr(u8)]
pub enum TetriminoKind {
    /// T-piece.
    T = 0,
    /// O-piece.
    O = 1,
    /// L-piece.
    L = 2,
    /// J-piece.
    J = 3,
    /// Z-piece.
    Z = 4,
    /// S-piece.
    S = 5,
    /// I-piece.
    I = 6,
}

impl TetriminoKind {
    /// Number of tetrimino kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in standard registration order.
    pub const ALL: [Self; Self::LEN] = [
        TetriminoKind::T,
        TetriminoKind::O,
        TetriminoKind::L,
        TetriminoKind::J,
        TetriminoKind::Z,
        TetriminoKind::S,
        TetriminoKind::I,
    ];

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrimino_engine::TetriminoKind;
    ///
    /// assert_eq!(TetriminoKind::I.as_char(), 'I');
    /// assert_eq!(TetriminoKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            TetriminoKind::T => 'T',
            TetriminoKind::O => 'O',
            TetriminoKind::L => 'L',
            TetriminoKind::J => 'J',
            TetriminoKind::Z => 'Z',
            TetriminoKind::S => 'S',
            TetriminoKind::I => 'I',
        }
    }

    /// Parses a kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrimino_engine::TetriminoKind;
    ///
    /// assert_eq!(TetriminoKind::from_char('S'), Some(TetriminoKind::S));
    /// assert_eq!(TetriminoKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'T' => Some(TetriminoKind::T),
            'O' => Some(TetriminoKind::O),
            'L' => Some(TetriminoKind::L),
            'J' => Some(TetriminoKind::J),
            'Z' => Some(TetriminoKind::Z),
            'S' => Some(TetriminoKind::S),
            'I' => Some(TetriminoKind::I),
            _ => None,
        }
    }
}

/// Display color of a tetrimino, as linear RGB components in `0.0..=1.0`.
///
/// The engine never interprets it; renderers decide how to show it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Immutable definition of one tetrimino shape.
///
/// `offsets` are lattice offsets relative to the piece root; `offsets[0]` is
/// always the root cell itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetriminoType {
    kind: TetriminoKind,
    offsets: [Point; 4],
    color: Rgb,
}

impl TetriminoType {
    #[must_use]
    pub const fn new(kind: TetriminoKind, offsets: [Point; 4], color: Rgb) -> Self {
        Self {
            kind,
            offsets,
            color,
        }
    }

    /// Returns the standard definition of `kind`.
    #[must_use]
    pub const fn standard(kind: TetriminoKind) -> Self {
        STANDARD_TYPES[kind as usize]
    }

    #[must_use]
    pub const fn kind(&self) -> TetriminoKind {
        self.kind
    }

    #[must_use]
    pub const fn offsets(&self) -> &[Point; 4] {
        &self.offsets
    }

    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Builds a new piece of this type with its root at the origin.
    ///
    /// Each cell gets a token derived from `id`, so pieces made with distinct
    /// ids never share tokens.
    #[must_use]
    pub fn make(&self, id: PieceId) -> Piece {
        Piece::new(id, self.kind, self.offsets)
    }
}

const STANDARD_TYPES: [TetriminoType; TetriminoKind::LEN] = {
    const fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }
    use TetriminoKind::{I, J, L, O, S, T, Z};
    [
        TetriminoType::new(
            T,
            [p(0, 0), p(1, 0), p(-1, 0), p(0, -1)],
            Rgb::new(0.23, 0.0, 0.27),
        ),
        TetriminoType::new(
            O,
            [p(0, 0), p(0, -1), p(1, 0), p(1, -1)],
            Rgb::new(0.7, 0.65, 0.02),
        ),
        TetriminoType::new(
            L,
            [p(0, 0), p(-1, -1), p(1, 0), p(-1, 0)],
            Rgb::new(0.75, 0.25, 0.0),
        ),
        TetriminoType::new(
            J,
            [p(0, 0), p(1, -1), p(1, 0), p(-1, 0)],
            Rgb::new(0.02, 0.02, 0.65),
        ),
        TetriminoType::new(
            Z,
            [p(0, 0), p(0, -1), p(-1, 0), p(1, -1)],
            Rgb::new(0.65, 0.02, 0.02),
        ),
        TetriminoType::new(
            S,
            [p(0, 0), p(0, -1), p(1, 0), p(-1, -1)],
            Rgb::new(0.02, 0.65, 0.02),
        ),
        TetriminoType::new(
            I,
            [p(0, 0), p(-1, 0), p(1, 0), p(2, 0)],
            Rgb::new(0.0, 0.5, 1.0),
        ),
    ]
};

/// The fixed set of tetrimino types used by a game.
///
/// A catalog is built exactly once, through [`CatalogBuilder`], and is never
/// mutated afterwards. It always holds one type per [`TetriminoKind`], in
/// registration order.
///
/// # Example
///
/// ```
/// use tetrimino_engine::{Catalog, PieceId, TetriminoKind};
///
/// let catalog = Catalog::standard();
/// assert_eq!(catalog.get_all().len(), 7);
///
/// let piece = catalog.make(TetriminoKind::T, PieceId(0));
/// assert_eq!(piece.kind(), TetriminoKind::T);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    types: ArrayVec<TetriminoType, { TetriminoKind::LEN }>,
}

impl Catalog {
    /// Builds the catalog of the 7 standard shapes.
    #[must_use]
    pub fn standard() -> Self {
        let mut builder = CatalogBuilder::new();
        for kind in TetriminoKind::ALL {
            builder
                .register(TetriminoType::standard(kind))
                .expect("standard kinds are distinct");
        }
        builder.build().expect("standard catalog is complete")
    }

    /// Returns every registered type, in registration order.
    #[must_use]
    pub fn get_all(&self) -> &[TetriminoType] {
        &self.types
    }

    /// Returns the type registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: TetriminoKind) -> &TetriminoType {
        self.types
            .iter()
            .find(|ty| ty.kind == kind)
            .expect("catalog holds every kind")
    }

    pub fn kinds(&self) -> impl Iterator<Item = TetriminoKind> + '_ {
        self.types.iter().map(TetriminoType::kind)
    }

    #[must_use]
    pub fn make(&self, kind: TetriminoKind, id: PieceId) -> Piece {
        self.get(kind).make(id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// One-time registration of tetrimino types.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    types: ArrayVec<TetriminoType, { TetriminoKind::LEN }>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ty: TetriminoType) -> Result<&mut Self, CatalogError> {
        if self.types.iter().any(|t| t.kind == ty.kind) {
            return Err(CatalogError::DuplicateKind { kind: ty.kind });
        }
        self.types.push(ty);
        Ok(self)
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        if let Some(kind) = TetriminoKind::ALL
            .into_iter()
            .find(|kind| !self.types.iter().any(|t| t.kind == *kind))
        {
            return Err(CatalogError::MissingKind { kind });
        }
        Ok(Catalog { types: self.types })
    }
}
