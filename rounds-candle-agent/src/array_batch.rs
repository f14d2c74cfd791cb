use ndarray::{ArrayD, Axis};
use num_traits::Zero;
use rounds_core::generic_replay_buffer::BatchBase;

/// A buffer consisting of an [`ArrayD`].
///
/// The first axis is the sample axis. The internal array is allocated with
/// shape `[capacity, data.shape()[1..]]` at the first push.
#[derive(Clone, Debug)]
pub struct ArrayBatch<T> {
    buf: Option<ArrayD<T>>,
    capacity: usize,
}

impl<T: Clone + Zero> ArrayBatch<T> {
    /// Creates a batch from an array whose first axis is the sample axis.
    pub fn from_array(a: ArrayD<T>) -> Self {
        let capacity = a.shape()[0];
        Self {
            buf: Some(a),
            capacity,
        }
    }

    /// The number of samples the batch can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone + Zero> BatchBase for ArrayBatch<T> {
    fn new(capacity: usize) -> Self {
        Self {
            buf: None,
            capacity,
        }
    }

    /// Pushes given data.
    ///
    /// Samples going past the capacity are placed in the head of the buffer.
    fn push(&mut self, ix: usize, data: Self) {
        let data = match data.buf {
            Some(data) if data.shape()[0] > 0 => data,
            _ => return,
        };

        let capacity = self.capacity;
        let buf = self.buf.get_or_insert_with(|| {
            let mut shape = data.shape().to_vec();
            shape[0] = capacity;
            ArrayD::zeros(shape)
        });

        for (i, sample) in data.axis_iter(Axis(0)).enumerate() {
            buf.index_axis_mut(Axis(0), (ix + i) % capacity)
                .assign(&sample);
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self {
            buf: self.buf.as_ref().map(|buf| buf.select(Axis(0), ixs)),
            capacity: ixs.len(),
        }
    }
}

impl<T: Clone + Zero> From<ArrayBatch<T>> for ArrayD<T> {
    fn from(b: ArrayBatch<T>) -> Self {
        b.buf.unwrap_or_else(|| ArrayD::zeros(vec![0]))
    }
}
