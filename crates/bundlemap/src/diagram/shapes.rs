//! Node shapes and their per-entity-type assignment
//!
//! Every entity type gets its own flowchart shape so that bundles of the
//! same type look alike in a diagram.

use std::collections::BTreeMap;
use std::fmt;

use crate::graph::NodeCatalog;

/// Flowchart node shapes, in palette order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// Rectangle: `id[label]`
    #[default]
    Rect,
    /// Rounded rectangle: `id(label)`
    Round,
    /// Stadium: `id([label])`
    Stadium,
    /// Subroutine: `id[[label]]`
    Subroutine,
    /// Cylinder (database): `id[(label)]`
    Cylinder,
    /// Circle: `id((label))`
    Circle,
    /// Asymmetric (flag): `id>label]`
    Asymmetric,
    /// Rhombus: `id{label}`
    Rhombus,
    /// Hexagon: `id{{label}}`
    Hexagon,
    /// Parallelogram: `id[/label/]`
    Parallelogram,
    /// Alternate parallelogram: `id[\label\]`
    ParallelogramAlt,
    /// Trapezoid: `id[/label\]`
    Trapezoid,
    /// Alternate trapezoid: `id[\label/]`
    TrapezoidAlt,
}

/// Fixed palette that entity types are assigned from, wrapping around
pub const PALETTE: [Shape; 13] = [
    Shape::Rect,
    Shape::Round,
    Shape::Stadium,
    Shape::Subroutine,
    Shape::Cylinder,
    Shape::Circle,
    Shape::Asymmetric,
    Shape::Rhombus,
    Shape::Hexagon,
    Shape::Parallelogram,
    Shape::ParallelogramAlt,
    Shape::Trapezoid,
    Shape::TrapezoidAlt,
];

impl Shape {
    /// Opening and closing delimiters of this shape in flowchart syntax
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            Shape::Rect => ("[", "]"),
            Shape::Round => ("(", ")"),
            Shape::Stadium => ("([", "])"),
            Shape::Subroutine => ("[[", "]]"),
            Shape::Cylinder => ("[(", ")]"),
            Shape::Circle => ("((", "))"),
            Shape::Asymmetric => (">", "]"),
            Shape::Rhombus => ("{", "}"),
            Shape::Hexagon => ("{{", "}}"),
            Shape::Parallelogram => ("[/", "/]"),
            Shape::ParallelogramAlt => ("[\\", "\\]"),
            Shape::Trapezoid => ("[/", "\\]"),
            Shape::TrapezoidAlt => ("[\\", "/]"),
        }
    }

    /// Wrap already-quoted label text in this shape's delimiters
    pub fn wrap(&self, label: &str) -> String {
        let (open, close) = self.delimiters();
        format!("{}{}{}", open, label, close)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Rect => write!(f, "rect"),
            Shape::Round => write!(f, "round"),
            Shape::Stadium => write!(f, "stadium"),
            Shape::Subroutine => write!(f, "subroutine"),
            Shape::Cylinder => write!(f, "cylinder"),
            Shape::Circle => write!(f, "circle"),
            Shape::Asymmetric => write!(f, "asymmetric"),
            Shape::Rhombus => write!(f, "rhombus"),
            Shape::Hexagon => write!(f, "hexagon"),
            Shape::Parallelogram => write!(f, "parallelogram"),
            Shape::ParallelogramAlt => write!(f, "parallelogram-alt"),
            Shape::Trapezoid => write!(f, "trapezoid"),
            Shape::TrapezoidAlt => write!(f, "trapezoid-alt"),
        }
    }
}

/// Entity type to shape assignment
///
/// Built from an ordered list of entity types: the n-th distinct type gets
/// `PALETTE[n % PALETTE.len()]`. The same ordered input always yields the
/// same mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeRegistry {
    assignments: BTreeMap<String, Shape>,
}

impl ShapeRegistry {
    pub fn new<I, S>(entity_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut assignments = BTreeMap::new();
        let mut next = 0;
        for entity_type in entity_types {
            assignments.entry(entity_type.into()).or_insert_with(|| {
                let shape = PALETTE[next % PALETTE.len()];
                next += 1;
                shape
            });
        }
        Self { assignments }
    }

    /// Assign shapes to a catalog's entity types, ordered by label
    pub fn from_catalog(catalog: &NodeCatalog) -> Self {
        Self::new(catalog.entity_types_by_label())
    }

    /// Shape of an entity type; unknown types get the first palette shape
    pub fn shape_for(&self, entity_type: &str) -> Shape {
        self.assignments
            .get(entity_type)
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
