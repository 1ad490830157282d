//! Type mappers: which leaves of one flattened type connect to which leaves
//! of another.
//!
//! A [`TypeMapper`] relates the flattened entries of type `a` (rows) to the
//! flattened entries of type `b` (columns) through a [`MappingMatrix`]. A
//! zero cell means "not mapped"; a non-zero cell records the order in which
//! mappings were added, which determines how leaves are concatenated when one
//! entry maps to several others.

use crate::error::GraphError;
use crate::flat::{self, FlatType};
use crate::ids::TypeId;
use crate::pool::Pool;
use crate::types::TypeDb;
use cerata_common::Interner;
use std::fmt;

/// A dense `rows x cols` matrix of mapping orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl MappingMatrix {
    /// An all-zero matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Builds a matrix from `(row, col)` pairs, in order.
    pub fn from_pairs(
        rows: usize,
        cols: usize,
        pairs: &[(usize, usize)],
    ) -> Result<Self, GraphError> {
        let mut m = Self::new(rows, cols);
        for &(r, c) in pairs {
            m.add(r, c)?;
        }
        Ok(m)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at `(row, col)`, 0 when out of range.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            0
        }
    }

    fn check(&self, row: usize, col: usize) -> Result<(), GraphError> {
        if row < self.rows && col < self.cols {
            Ok(())
        } else {
            Err(GraphError::MapIndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Sets a cell.
    pub fn set(&mut self, row: usize, col: usize, value: u32) -> Result<(), GraphError> {
        self.check(row, col)?;
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    /// Marks `(row, col)` as mapped after every mapping already present in
    /// the same row or column.
    pub fn add(&mut self, row: usize, col: usize) -> Result<&mut Self, GraphError> {
        self.check(row, col)?;
        let next = self.max_of_row(row).max(self.max_of_col(col)) + 1;
        self.cells[row * self.cols + col] = next;
        Ok(self)
    }

    /// Largest value in a row.
    pub fn max_of_row(&self, row: usize) -> u32 {
        (0..self.cols).map(|c| self.get(row, c)).max().unwrap_or(0)
    }

    /// Largest value in a column.
    pub fn max_of_col(&self, col: usize) -> u32 {
        (0..self.rows).map(|r| self.get(r, col)).max().unwrap_or(0)
    }

    /// Columns mapped from `row`, in mapping order.
    pub fn mapped_from_row(&self, row: usize) -> Vec<usize> {
        let mut out: Vec<(u32, usize)> = (0..self.cols)
            .map(|c| (self.get(row, c), c))
            .filter(|(v, _)| *v > 0)
            .collect();
        out.sort();
        out.into_iter().map(|(_, c)| c).collect()
    }

    /// Rows mapped into `col`, in mapping order.
    pub fn mapped_into_col(&self, col: usize) -> Vec<usize> {
        let mut out: Vec<(u32, usize)> = (0..self.rows)
            .map(|r| (self.get(r, col), r))
            .filter(|(v, _)| *v > 0)
            .collect();
        out.sort();
        out.into_iter().map(|(_, r)| r).collect()
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut t = Self::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.cells[c * self.rows + r] = self.get(r, c);
            }
        }
        t
    }

    /// Whether no cell is set.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|v| *v == 0)
    }
}

impl fmt::Display for MappingMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row: Vec<String> = (0..self.cols).map(|c| self.get(r, c).to_string()).collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

/// A mapping between the flattened entries of two types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    a: TypeId,
    b: TypeId,
    flat_a: Vec<FlatType>,
    flat_b: Vec<FlatType>,
    matrix: MappingMatrix,
}

const CONTROL_NAMES: [&str; 4] = ["valid", "ready", "dvalid", "last"];

impl TypeMapper {
    /// An empty mapper between weakly equal types.
    pub fn make(types: &TypeDb, a: TypeId, b: TypeId) -> Result<Self, GraphError> {
        if !flat::weakly_equal(types, a, b) {
            return Err(GraphError::NotWeaklyEqual {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
        Ok(Self::empty(types, a, b))
    }

    fn empty(types: &TypeDb, a: TypeId, b: TypeId) -> Self {
        let flat_a = flat::flatten(types, a);
        let flat_b = flat::flatten(types, b);
        let matrix = MappingMatrix::new(flat_a.len(), flat_b.len());
        Self {
            a,
            b,
            flat_a,
            flat_b,
            matrix,
        }
    }

    /// A mapper with an explicit matrix. The types need not be weakly equal.
    pub fn from_matrix(
        types: &TypeDb,
        a: TypeId,
        b: TypeId,
        matrix: MappingMatrix,
    ) -> Result<Self, GraphError> {
        let mut mapper = Self::empty(types, a, b);
        if matrix.rows() != mapper.matrix.rows() || matrix.cols() != mapper.matrix.cols() {
            return Err(GraphError::MatrixShape {
                rows: mapper.matrix.rows(),
                cols: mapper.matrix.cols(),
                found_rows: matrix.rows(),
                found_cols: matrix.cols(),
            });
        }
        mapper.matrix = matrix;
        Ok(mapper)
    }

    /// A mapper derived from the shapes of the two types.
    ///
    /// Handshake leaves (`valid`, `ready`, `dvalid`, `last`) are paired by
    /// name and level: the k-th occurrence in `a` with the k-th in `b`. All
    /// other entries are paired by position among the remaining entries when
    /// their kind and level agree. Anything else stays unmapped.
    pub fn make_implicit(types: &TypeDb, interner: &Interner, a: TypeId, b: TypeId) -> Self {
        let mut mapper = Self::empty(types, a, b);
        let control = |f: &FlatType| -> Option<&'static str> {
            let last = f.last_part(interner)?;
            let name = interner.resolve(last);
            CONTROL_NAMES.iter().copied().find(|c| *c == name)
        };

        let (mut payload_a, mut payload_b) = (Vec::new(), Vec::new());
        let mut used_b = vec![false; mapper.flat_b.len()];
        for (i, fa) in mapper.flat_a.iter().enumerate() {
            match control(fa) {
                Some(name) => {
                    let k = mapper.flat_a[..i]
                        .iter()
                        .filter(|f| control(*f) == Some(name) && f.level == fa.level)
                        .count();
                    let j = mapper
                        .flat_b
                        .iter()
                        .enumerate()
                        .filter(|(_, fb)| control(*fb) == Some(name) && fb.level == fa.level)
                        .map(|(j, _)| j)
                        .nth(k);
                    if let Some(j) = j {
                        used_b[j] = true;
                        let next = mapper.matrix.max_of_row(i).max(mapper.matrix.max_of_col(j)) + 1;
                        mapper.matrix.cells[i * mapper.matrix.cols + j] = next;
                    }
                }
                None => payload_a.push(i),
            }
        }
        for (j, fb) in mapper.flat_b.iter().enumerate() {
            if !used_b[j] && control(fb).is_none() {
                payload_b.push(j);
            }
        }
        for (&i, &j) in payload_a.iter().zip(&payload_b) {
            let (fa, fb) = (&mapper.flat_a[i], &mapper.flat_b[j]);
            if fa.level == fb.level && types.tag(fa.ty) == types.tag(fb.ty) {
                let next = mapper.matrix.max_of_row(i).max(mapper.matrix.max_of_col(j)) + 1;
                mapper.matrix.cells[i * mapper.matrix.cols + j] = next;
            }
        }
        mapper
    }

    /// Maps flat entry `i` of `a` to flat entry `j` of `b`.
    pub fn add(&mut self, i: usize, j: usize) -> Result<&mut Self, GraphError> {
        self.matrix.add(i, j)?;
        Ok(self)
    }

    /// The mapper from `b` to `a`.
    pub fn inverse(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            flat_a: self.flat_b.clone(),
            flat_b: self.flat_a.clone(),
            matrix: self.matrix.transpose(),
        }
    }

    /// Entries of `b` that entry `i` of `a` maps to, in order.
    pub fn mapping_of(&self, i: usize) -> Vec<usize> {
        self.matrix.mapped_from_row(i)
    }

    /// Entries of `a` that map into entry `j` of `b`, in order.
    pub fn sources_of(&self, j: usize) -> Vec<usize> {
        self.matrix.mapped_into_col(j)
    }

    /// Source type.
    pub fn a(&self) -> TypeId {
        self.a
    }

    /// Destination type.
    pub fn b(&self) -> TypeId {
        self.b
    }

    /// Flattened source type.
    pub fn flat_a(&self) -> &[FlatType] {
        &self.flat_a
    }

    /// Flattened destination type.
    pub fn flat_b(&self) -> &[FlatType] {
        &self.flat_b
    }

    /// The mapping matrix.
    pub fn matrix(&self) -> &MappingMatrix {
        &self.matrix
    }

    /// Leaves of `a` that are concrete but map nowhere.
    pub fn unmapped_leaves(&self, types: &TypeDb) -> Vec<usize> {
        self.flat_a
            .iter()
            .enumerate()
            .filter(|(i, f)| !types.is_nested(f.ty) && self.mapping_of(*i).is_empty())
            .map(|(i, _)| i)
            .collect()
    }
}

impl Pool {
    /// An empty mapper between weakly equal types.
    pub fn mapper(&self, a: TypeId, b: TypeId) -> Result<TypeMapper, GraphError> {
        TypeMapper::make(&self.types, a, b).map_err(|_| GraphError::NotWeaklyEqual {
            a: self.type_name(a).to_string(),
            b: self.type_name(b).to_string(),
        })
    }

    /// A mapper with an explicit matrix.
    pub fn mapper_from_matrix(
        &self,
        a: TypeId,
        b: TypeId,
        matrix: MappingMatrix,
    ) -> Result<TypeMapper, GraphError> {
        TypeMapper::from_matrix(&self.types, a, b, matrix)
    }

    /// A mapper with an explicit list of `(row, col)` pairs.
    pub fn mapper_from_pairs(
        &self,
        a: TypeId,
        b: TypeId,
        pairs: &[(usize, usize)],
    ) -> Result<TypeMapper, GraphError> {
        let rows = self.flatten(a).len();
        let cols = self.flatten(b).len();
        let matrix = MappingMatrix::from_pairs(rows, cols, pairs)?;
        self.mapper_from_matrix(a, b, matrix)
    }

    /// A heuristically derived mapper.
    pub fn implicit_mapper(&self, a: TypeId, b: TypeId) -> TypeMapper {
        TypeMapper::make_implicit(&self.types, self.interner(), a, b)
    }

    /// Attaches `mapper` to its source type and its inverse to its
    /// destination type, replacing mappers for the same pair.
    pub fn add_mapper(&mut self, mapper: TypeMapper) {
        let (a, b) = (mapper.a(), mapper.b());
        log::debug!(
            "attaching mapper {} -> {}",
            self.type_name(a),
            self.type_name(b)
        );
        let inverse = mapper.inverse();
        attach(&mut self.types.get_mut(a).mappers, mapper);
        if a != b {
            attach(&mut self.types.get_mut(b).mappers, inverse);
        }
    }

    /// The mapper from `a` to `b`: an attached one, else the identity for
    /// `a == b`, else an implicit one for weakly equal types.
    pub fn get_mapper(&self, a: TypeId, b: TypeId) -> Result<TypeMapper, GraphError> {
        if let Some(m) = self.ty(a).mappers().iter().find(|m| m.b() == b) {
            return Ok(m.clone());
        }
        if let Some(m) = self.ty(b).mappers().iter().find(|m| m.b() == a) {
            return Ok(m.inverse());
        }
        if a == b || self.weakly_equal(a, b) {
            return Ok(self.implicit_mapper(a, b));
        }
        Err(GraphError::NoMapper {
            src: self.type_name(a).to_string(),
            src_ty: self.types.tag(a).to_string(),
            dst: self.type_name(b).to_string(),
            dst_ty: self.types.tag(b).to_string(),
        })
    }
}

fn attach(list: &mut Vec<TypeMapper>, mapper: TypeMapper) {
    match list.iter_mut().find(|m| m.b() == mapper.b()) {
        Some(existing) => *existing = mapper,
        None => list.push(mapper),
    }
}
