use anyhow::Result;
use ironstream::testing::*;
use ironstream::*;

/// Pages `[first, last)` of a numbered result set; splits on page boundaries.
struct Pages {
    first: u32,
    last: u32,
    per_page: u32,
}

impl Spliterator<String> for Pages {
    fn try_split(&mut self) -> Option<Box<dyn Spliterator<String>>> {
        let pages = self.last - self.first;
        if pages < 2 {
            return None;
        }
        let mid = self.first + pages / 2;
        let prefix = Pages {
            first: self.first,
            last: mid,
            per_page: self.per_page,
        };
        self.first = mid;
        Some(Box::new(prefix))
    }

    fn estimate_size(&self) -> Option<usize> {
        Some(((self.last - self.first) * self.per_page) as usize)
    }

    fn into_elem_iter(self: Box<Self>) -> ElemIter<String> {
        let per_page = self.per_page;
        Box::new(
            (self.first..self.last)
                .flat_map(move |page| (0..per_page).map(move |row| format!("p{page}r{row}"))),
        )
    }
}

#[test]
fn custom_spliterator_sequential_and_parallel_agree() -> Result<()> {
    let p = TestPipeline::new();
    let pages = || Pages {
        first: 0,
        last: 16,
        per_page: 3,
    };
    let seq = from_spliterator(&p, pages()).to_vec()?;
    let par = from_spliterator(&p, pages())
        .parallel_with(None, Some(3))
        .to_vec()?;
    assert_eq!(seq.len(), 48);
    assert_eq!(seq[0], "p0r0");
    assert_eq!(seq[47], "p15r2");
    assert_collections_equal(&par, &seq);
    Ok(())
}

#[test]
fn split_leaves_cover_source_in_order() {
    let root: Box<dyn Spliterator<String>> = Box::new(Pages {
        first: 0,
        last: 8,
        per_page: 2,
    });
    let leaves = split_leaves(root, &SplitPolicy::new(2, Some(2)));
    assert_eq!(leaves.len(), 8);

    let mut all = Vec::new();
    for leaf in leaves {
        leaf.for_each_remaining(&mut |row| all.push(row));
    }
    assert_eq!(all.len(), 16);
    assert_eq!(all.first().map(String::as_str), Some("p0r0"));
    assert_eq!(all.last().map(String::as_str), Some("p7r1"));
}

#[test]
fn sized_iterator_source_never_splits() -> Result<()> {
    let p = TestPipeline::new();
    let spl = IterSpliterator::sized(Box::new((0..100u32).map(|n| n * n)), 100);
    let total = from_spliterator(&p, spl).parallel().sum()?;
    assert_eq!(total, (0..100u32).map(|n| n * n).sum::<u32>());
    Ok(())
}

#[test]
fn range_spliterator_sources() -> Result<()> {
    let p = TestPipeline::new();
    assert_eq!(range(&p, 5i32, 5).count()?, 0);
    assert_eq!(range(&p, 5i32, 1).count()?, 0);
    assert_eq!(range_closed(&p, -3i8, 3).to_vec()?, vec![-3, -2, -1, 0, 1, 2, 3]);
    assert_eq!(range_closed(&p, u8::MAX - 1, u8::MAX).to_vec()?, vec![254, 255]);
    Ok(())
}
