use crate::interval::{Interval, SubInterval};

#[derive(Debug, Clone, Copy)]
struct Span {
    begin: u64,
    end: u64,
    step: Option<u64>,
}

impl Span {
    fn at(value: u64) -> Self {
        Self {
            begin: value,
            end: value,
            step: None,
        }
    }

    fn is_pair(&self) -> bool {
        self.step.is_some_and(|step| self.end - self.begin == step)
    }
}

/// Collapse a list of integers into the shortest range expression that lists
/// all of them, e.g. `[1, 2, 3, 10, 11, 12]` → `1-3,10-12`.
///
/// Order and duplicates in the input don't matter. The result parses back
/// into exactly the distinct input values. An empty input gives `""`.
pub fn compact_range<I>(values: I) -> String
where
    I: IntoIterator<Item = u64>,
{
    compact(values).to_string()
}

/// Like [`compact_range`], but returns the [`Interval`] itself.
pub fn compact<I>(values: I) -> Interval
where
    I: IntoIterator<Item = u64>,
{
    let mut values: Vec<u64> = values.into_iter().collect();
    values.sort_unstable();

    let Some((&first, rest)) = values.split_first() else {
        return Interval::default();
    };

    let mut spans = vec![Span::at(first)];
    for &v in rest {
        let Some(span) = spans.last_mut() else {
            break;
        };
        if v == span.end {
            continue;
        }
        let step = *span.step.get_or_insert(v - span.begin);
        if span.end.checked_add(step) == Some(v) {
            span.end = v;
        } else {
            spans.push(Span::at(v));
        }
    }

    absorb_pairs(&mut spans);

    let parts = spans
        .into_iter()
        .map(|s| match s.step {
            Some(step) if s.begin != s.end => SubInterval::spanning(s.begin, s.end, step),
            _ => SubInterval::single(s.begin),
        })
        .collect();
    Interval::from_parts(parts)
}

/// Move the second value of a two-value span into the next span when that
/// gives the next span a tighter step (`1,100,101` becomes `1` + `100-101`
/// instead of `1-100x99` + `101`).
///
/// Only looks one span ahead, left to right, in place.
fn absorb_pairs(spans: &mut [Span]) {
    for i in 0..spans.len().saturating_sub(1) {
        let current = spans[i];
        if !current.is_pair() {
            continue;
        }
        let Some(step) = current.step else {
            continue;
        };
        let next = spans[i + 1];

        if next.begin == next.end {
            let tighter = next.begin - current.end;
            if tighter < step {
                spans[i + 1].begin = current.end;
                spans[i + 1].step = Some(tighter);
                spans[i].end = current.begin;
            }
        } else if next
            .step
            .is_some_and(|next_step| current.end.checked_add(next_step) == Some(next.begin))
        {
            spans[i + 1].begin = current.end;
            spans[i].end = current.begin;
        }
    }
}
