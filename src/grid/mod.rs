//! Borrowed views over the dense prediction grids.
//!
//! Both grids are laid out row-major over their logical axes. The probability
//! grid has shape `[W, H]` and element `(i, j)` lives at `i * H + j`. The
//! distance grid has shape `[W, H, R]` with the ray axis innermost, so the `R`
//! distances of pixel `(i, j)` form one contiguous slice. Timelapse stacks put
//! the frame axis first (`[T, W, H]` and `[T, W, H, R]`) and split into
//! zero-copy per-frame views.

use crate::util::{StarDistError, StarDistResult};

/// Borrowed 2D view of per-pixel object probabilities.
#[derive(Copy, Clone, Debug)]
pub struct ProbView<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
}

impl<'a> ProbView<'a> {
    /// Creates a view with `width` pixels along `i` and `height` along `j`.
    pub fn new(data: &'a [f32], width: usize, height: usize) -> StarDistResult<Self> {
        let needed = required_len(&[width, height])?;
        if data.len() < needed {
            return Err(StarDistError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a view from an explicit `[W, H]` shape.
    pub fn from_shape(data: &'a [f32], shape: &[usize]) -> StarDistResult<Self> {
        match *shape {
            [width, height] => Self::new(data, width, height),
            _ => Err(StarDistError::InvalidShape {
                grid: "probability",
                expected: 2,
                got: shape.to_vec(),
            }),
        }
    }

    /// Splits a `[T, W, H]` stack into one view per frame.
    pub fn frames(data: &'a [f32], shape: &[usize]) -> StarDistResult<Vec<Self>> {
        let &[frames, width, height] = shape else {
            return Err(StarDistError::InvalidShape {
                grid: "probability stack",
                expected: 3,
                got: shape.to_vec(),
            });
        };
        let frame_len = required_len(&[width, height])?;
        split_frames(data, frames, frame_len)?
            .into_iter()
            .map(|chunk| Self::new(chunk, width, height))
            .collect()
    }

    /// Returns the extent along the first axis.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the extent along the second axis.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the shape as `[W, H]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    /// Returns the probability at `(i, j)` if it is within bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.width || j >= self.height {
            return None;
        }
        self.data.get(i * self.height + j).copied()
    }
}

/// Borrowed 3D view of per-pixel radial distances.
#[derive(Copy, Clone, Debug)]
pub struct DistView<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
    nrays: usize,
}

impl<'a> DistView<'a> {
    /// Creates a view with `nrays` distances per pixel.
    pub fn new(data: &'a [f32], width: usize, height: usize, nrays: usize) -> StarDistResult<Self> {
        let needed = required_len(&[width, height, nrays])?;
        if data.len() < needed {
            return Err(StarDistError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            nrays,
        })
    }

    /// Creates a view from an explicit `[W, H, R]` shape.
    pub fn from_shape(data: &'a [f32], shape: &[usize]) -> StarDistResult<Self> {
        match *shape {
            [width, height, nrays] => Self::new(data, width, height, nrays),
            _ => Err(StarDistError::InvalidShape {
                grid: "distance",
                expected: 3,
                got: shape.to_vec(),
            }),
        }
    }

    /// Splits a `[T, W, H, R]` stack into one view per frame.
    pub fn frames(data: &'a [f32], shape: &[usize]) -> StarDistResult<Vec<Self>> {
        let &[frames, width, height, nrays] = shape else {
            return Err(StarDistError::InvalidShape {
                grid: "distance stack",
                expected: 4,
                got: shape.to_vec(),
            });
        };
        let frame_len = required_len(&[width, height, nrays])?;
        split_frames(data, frames, frame_len)?
            .into_iter()
            .map(|chunk| Self::new(chunk, width, height, nrays))
            .collect()
    }

    /// Returns the extent along the first axis.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the extent along the second axis.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of rays per pixel.
    pub fn nrays(&self) -> usize {
        self.nrays
    }

    /// Returns the shape as `[W, H, R]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.width, self.height, self.nrays]
    }

    /// Returns the ray distances at `(i, j)` in ray order.
    pub fn rays(&self, i: usize, j: usize) -> Option<&'a [f32]> {
        if i >= self.width || j >= self.height {
            return None;
        }
        let start = (i * self.height + j) * self.nrays;
        self.data.get(start..start + self.nrays)
    }
}

fn required_len(shape: &[usize]) -> StarDistResult<usize> {
    let (width, height) = (shape[0], shape[1]);
    if shape.iter().any(|&d| d == 0) {
        return Err(StarDistError::InvalidDimensions { width, height });
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(StarDistError::InvalidDimensions { width, height })
}

fn split_frames(data: &[f32], frames: usize, frame_len: usize) -> StarDistResult<Vec<&[f32]>> {
    let needed = frames
        .checked_mul(frame_len)
        .ok_or(StarDistError::BufferTooSmall {
            needed: usize::MAX,
            got: data.len(),
        })?;
    if data.len() < needed {
        return Err(StarDistError::BufferTooSmall {
            needed,
            got: data.len(),
        });
    }
    Ok(data[..needed].chunks_exact(frame_len).collect())
}

#[cfg(test)]
mod tests {
    use super::{DistView, ProbView};
    use crate::util::StarDistError;

    #[test]
    fn prob_view_indexes_first_axis_outer() {
        let data: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let view = ProbView::new(&data, 2, 3).unwrap();
        assert_eq!(view.get(0, 2), Some(2.0));
        assert_eq!(view.get(1, 0), Some(3.0));
        assert_eq!(view.get(2, 0), None);
        assert_eq!(view.get(0, 3), None);
    }

    #[test]
    fn dist_view_returns_contiguous_rays() {
        let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
        let view = DistView::new(&data, 2, 3, 4).unwrap();
        assert_eq!(view.rays(1, 1).unwrap(), &[16.0, 17.0, 18.0, 19.0]);
        assert!(view.rays(1, 3).is_none());
    }

    #[test]
    fn zero_sized_axis_is_rejected() {
        let data = [0.0f32; 4];
        let err = DistView::new(&data, 2, 2, 0).unwrap_err();
        assert_eq!(
            err,
            StarDistError::InvalidDimensions {
                width: 2,
                height: 2
            }
        );
    }

    #[test]
    fn frames_split_without_copying() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let frames = ProbView::frames(&data, &[3, 2, 2]).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].get(0, 0), Some(8.0));

        let err = ProbView::frames(&data, &[4, 2, 2]).unwrap_err();
        assert_eq!(err, StarDistError::BufferTooSmall { needed: 16, got: 12 });
    }
}
