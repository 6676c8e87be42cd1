use std::f64::consts::PI;

use crate::error::{OperationError, Result};
use crate::geometry::surface::Cylinder;
use crate::math::{Point3, RigidTransform, Vector3, TOLERANCE};
use crate::topology::{FaceId, FaceSurface, ShellData, SolidId, TopologyStore};

use super::{MakeFace, MakePatch, MakeSolid, MakeWire, WireSegment};

/// One step along a sheet profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileStep {
    /// Straight leg of the given length.
    Leg(f64),
    /// Circular bend. Positive angles turn left (toward the side the sheet
    /// is thickened to), negative angles turn right.
    Bend { inner_radius: f64, angle: f64 },
}

/// Builds a constant-thickness sheet-metal solid by sweeping a bent
/// profile along the width direction.
///
/// The profile starts at the origin heading along +X in the XZ plane and is
/// thickened toward its left, so a profile starting with a leg has its first
/// side on `z = 0` and the second on `z = thickness`. The width runs along
/// +Y. Faces are listed first side first (one face per step), then the
/// second side, then the start and end strips, then the caps at `y = 0`
/// and `y = width`.
pub struct MakeBentSheet {
    steps: Vec<ProfileStep>,
    thickness: f64,
    width: f64,
}

/// Cross-section of the sheet at one profile station.
#[derive(Debug, Clone, Copy)]
struct Station {
    a: Point3,
    b: Point3,
}

/// How the profile gets from one station to the next.
#[derive(Debug, Clone, Copy)]
enum Piece {
    Straight,
    /// Bend around `center` about `axis`, sweeping `sweep` radians
    /// counter-clockwise.
    Arc {
        center: Point3,
        axis: Vector3,
        sweep: f64,
    },
}

impl MakeBentSheet {
    #[must_use]
    pub fn new(thickness: f64, width: f64) -> Self {
        Self {
            steps: Vec::new(),
            thickness,
            width,
        }
    }

    #[must_use]
    pub fn leg(mut self, length: f64) -> Self {
        self.steps.push(ProfileStep::Leg(length));
        self
    }

    #[must_use]
    pub fn bend(mut self, inner_radius: f64, angle: f64) -> Self {
        self.steps.push(ProfileStep::Bend {
            inner_radius,
            angle,
        });
        self
    }

    /// Executes the operation, creating the closed solid.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] when the thickness or width
    /// is not positive, the profile does not start and end with a leg, or
    /// a leg length, bend radius or bend angle is out of range.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        self.validate()?;
        let (stations, pieces) = self.trace()?;
        let lift = Vector3::y() * self.width;

        let mut faces = Vec::with_capacity(2 * pieces.len() + 4);
        for side in [Side::A, Side::B] {
            for (i, piece) in pieces.iter().enumerate() {
                let (from, to) = (side.pick(&stations[i]), side.pick(&stations[i + 1]));
                faces.push(self.side_face(store, from, to, piece)?);
            }
        }
        for station in [stations[0], stations[stations.len() - 1]] {
            faces.push(planar(
                store,
                vec![station.a, station.b, station.b + lift, station.a + lift],
            )?);
        }
        for offset in [Vector3::zeros(), lift] {
            faces.push(cap_face(store, &stations, &pieces, &offset)?);
        }

        let shell = store.add_shell(ShellData {
            faces,
            is_closed: true,
        });
        MakeSolid::new(shell, vec![]).execute(store)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(OperationError::InvalidInput(msg.into()).into()) };
        if !(self.thickness > TOLERANCE && self.width > TOLERANCE) {
            return invalid("sheet thickness and width must be positive");
        }
        if !matches!(self.steps.first(), Some(ProfileStep::Leg(_)))
            || !matches!(self.steps.last(), Some(ProfileStep::Leg(_)))
        {
            return invalid("sheet profile must start and end with a leg");
        }
        for step in &self.steps {
            match *step {
                ProfileStep::Leg(length) if length <= TOLERANCE => {
                    return invalid("leg length must be positive");
                }
                ProfileStep::Bend {
                    inner_radius,
                    angle,
                } if inner_radius <= TOLERANCE || angle.abs() <= TOLERANCE || angle.abs() > PI => {
                    return invalid("bend needs a positive radius and 0 < |angle| <= pi");
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Walks the profile, returning `steps.len() + 1` stations and the piece
    /// joining each consecutive pair.
    fn trace(&self) -> Result<(Vec<Station>, Vec<Piece>)> {
        let t = self.thickness;
        let mut heading = Vector3::x();
        let mut left = Vector3::z();
        let mut station = Station {
            a: Point3::origin(),
            b: Point3::origin() + left * t,
        };
        let mut stations = vec![station];
        let mut pieces = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            match *step {
                ProfileStep::Leg(length) => {
                    let d = heading * length;
                    station = Station {
                        a: station.a + d,
                        b: station.b + d,
                    };
                    pieces.push(Piece::Straight);
                }
                ProfileStep::Bend {
                    inner_radius,
                    angle,
                } => {
                    let center = if angle > 0.0 {
                        station.a + left * (inner_radius + t)
                    } else {
                        station.a - left * inner_radius
                    };
                    // Counter-clockwise in the profile plane is a rotation
                    // about -Y.
                    let turn = RigidTransform::rotation_about(&center, &-Vector3::y(), angle)?;
                    station = Station {
                        a: turn.transform_point(&station.a),
                        b: turn.transform_point(&station.b),
                    };
                    heading = turn.transform_vector(&heading);
                    left = turn.transform_vector(&left);
                    pieces.push(Piece::Arc {
                        center,
                        axis: -Vector3::y() * angle.signum(),
                        sweep: angle.abs(),
                    });
                }
            }
            stations.push(station);
        }
        Ok((stations, pieces))
    }

    fn side_face(
        &self,
        store: &mut TopologyStore,
        from: Point3,
        to: Point3,
        piece: &Piece,
    ) -> Result<FaceId> {
        let lift = Vector3::y() * self.width;
        match *piece {
            Piece::Straight => planar(store, vec![from, to, to + lift, from + lift]),
            Piece::Arc {
                center,
                axis,
                sweep,
            } => {
                let radial = from - center;
                let cylinder = Cylinder::new(center, radial.norm(), axis, radial)?;
                let v_range = if axis.y > 0.0 {
                    (0.0, self.width)
                } else {
                    (-self.width, 0.0)
                };
                MakePatch::new(FaceSurface::Cylinder(cylinder), (0.0, sweep), v_range).execute(store)
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    A,
    B,
}

impl Side {
    fn pick(self, station: &Station) -> Point3 {
        match self {
            Self::A => station.a,
            Self::B => station.b,
        }
    }
}

fn planar(store: &mut TopologyStore, points: Vec<Point3>) -> Result<FaceId> {
    let wire = MakeWire::new(points, true).execute(store)?;
    MakeFace::new(wire, vec![]).execute(store)
}

/// Profile outline shifted by `offset`: along the first side, across the
/// end strip, back along the second side.
fn cap_face(
    store: &mut TopologyStore,
    stations: &[Station],
    pieces: &[Piece],
    offset: &Vector3,
) -> Result<FaceId> {
    let segment = |to: Point3, piece: &Piece, reverse: bool| match *piece {
        Piece::Straight => WireSegment::Line(to + offset),
        Piece::Arc { center, axis, .. } => WireSegment::Arc {
            center: center + offset,
            normal: if reverse { -axis } else { axis },
            end: to + offset,
        },
    };

    let mut segments = Vec::with_capacity(2 * pieces.len() + 2);
    for (i, piece) in pieces.iter().enumerate() {
        segments.push(segment(stations[i + 1].a, piece, false));
    }
    segments.push(WireSegment::Line(stations[pieces.len()].b + offset));
    for (i, piece) in pieces.iter().enumerate().rev() {
        segments.push(segment(stations[i].b, piece, true));
    }
    segments.push(WireSegment::Line(stations[0].a + offset));

    let wire = MakeWire::from_segments(stations[0].a + offset, segments, true).execute(store)?;
    MakeFace::new(wire, vec![]).execute(store)
}
