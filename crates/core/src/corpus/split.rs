//! Deterministic train/dev split.

/// Records routed to each partition, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub dev: Vec<T>,
}

/// Every `stride`-th item goes to dev. `round(1 / dev_ratio)`, with 0 for
/// ratios that are not positive and finite.
pub fn dev_stride(dev_ratio: f64) -> usize {
    if !dev_ratio.is_finite() || dev_ratio <= 0.0 {
        return 0;
    }
    let stride = (1.0 / dev_ratio).round();
    if stride.is_finite() && stride >= 0.0 {
        stride as usize
    } else {
        0
    }
}

/// Split items by 1-based position: position `i` goes to dev iff
/// `i % stride == 0`.
pub fn split_dataset<T>(items: Vec<T>, dev_ratio: f64) -> Split<T> {
    let stride = dev_stride(dev_ratio);
    match stride {
        0 => {
            log::warn!(
                "Invalid dev ratio {}: everything goes to the training set",
                dev_ratio
            );
            Split {
                train: items,
                dev: Vec::new(),
            }
        }
        1 => {
            log::warn!(
                "Invalid dev ratio {}: everything goes to the dev set",
                dev_ratio
            );
            Split {
                train: Vec::new(),
                dev: items,
            }
        }
        _ => {
            let mut split = Split {
                train: Vec::with_capacity(items.len()),
                dev: Vec::with_capacity(items.len() / stride + 1),
            };
            for (i, item) in items.into_iter().enumerate() {
                if (i + 1) % stride == 0 {
                    split.dev.push(item);
                } else {
                    split.train.push(item);
                }
            }
            split
        }
    }
}
