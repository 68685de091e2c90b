//! Core value types shared by the rules adapter and the search core.

use std::fmt;

use serde::Serialize;

/// Search score. Higher is always better for the perspective side.
pub type Score = f64;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("White"),
            Side::Black => f.write_str("Black"),
        }
    }
}

/// Piece kind (colour is carried separately by [`Side`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "PAWN",
            PieceKind::Knight => "KNIGHT",
            PieceKind::Bishop => "BISHOP",
            PieceKind::Rook => "ROOK",
            PieceKind::Queen => "QUEEN",
            PieceKind::King => "KING",
        }
    }
}

/// Material weight per piece kind.
///
/// The same table drives both the material evaluator and the capture-first
/// move ordering, so a piece that is worth more is also tried earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceWeights {
    weights: [u32; 6],
}

impl PieceWeights {
    pub const fn new(weights: [u32; 6]) -> Self {
        Self { weights }
    }

    #[inline]
    pub const fn weight(&self, kind: PieceKind) -> u32 {
        self.weights[kind.index()]
    }

    /// Smallest non-zero weight in the table, or `None` if every weight is 0.
    pub fn smallest_positive(&self) -> Option<u32> {
        self.weights.iter().copied().filter(|w| *w > 0).min()
    }
}

impl Default for PieceWeights {
    /// Pawn 1, knight 5, bishop 4, rook 3, queen 10, king 0.
    ///
    /// Kings always cancel out in a material balance, so they carry no weight.
    fn default() -> Self {
        Self::new([1, 5, 4, 3, 10, 0])
    }
}
