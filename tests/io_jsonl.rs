use anyhow::Result;
use ironstream::testing::*;
use ironstream::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
struct Rec {
    id: u32,
    word: String,
}

fn recs() -> Vec<Rec> {
    vec![
        Rec {
            id: 1,
            word: "hi".into(),
        },
        Rec {
            id: 2,
            word: "there".into(),
        },
        Rec {
            id: 3,
            word: "again".into(),
        },
    ]
}

#[cfg(feature = "io-jsonl")]
#[test]
fn jsonl_record_source_loads_in_file_order() -> Result<()> {
    let file = mock_jsonl_file(&recs())?;
    let p = TestPipeline::new();
    let src = JsonlRecordSource::<Rec>::new(file.path());
    let words = from_record_source(&p, &src)?
        .filter(|r| r.id != 2)
        .map(|r| r.word.clone())
        .to_vec()?;
    assert_eq!(words, vec!["hi", "again"]);
    Ok(())
}

#[cfg(feature = "io-jsonl")]
#[test]
fn jsonl_roundtrip_through_pipeline() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let file = tmp.path().join("nested").join("out.jsonl");

    let p = TestPipeline::new();
    let written = from_vec(&p, recs())
        .map(|r| Rec {
            id: r.id * 10,
            word: r.word.to_uppercase(),
        })
        .write_jsonl(&file)?;
    assert_eq!(written, 3);

    let back = read_jsonl::<Rec>(&p, &file)?.to_vec()?;
    assert_eq!(back[0], Rec { id: 10, word: "HI".into() });
    assert_eq!(back.len(), 3);
    Ok(())
}

#[cfg(feature = "io-jsonl")]
#[test]
fn jsonl_parse_error_names_the_line() -> Result<()> {
    let file = mock_bytes_file(b"{\"id\":1,\"word\":\"a\"}\n\n{\"id\":\"x\"}\n")?;
    let p = TestPipeline::new();
    let err = read_jsonl::<Rec>(&p, file.path()).err().expect("bad record");
    assert!(format!("{err:#}").contains("line 3"));
    assert_eq!(p.node_count(), 0);
    Ok(())
}

#[test]
fn vec_record_source_feeds_a_pipeline() -> Result<()> {
    let p = TestPipeline::new();
    let src = VecRecordSource::new(recs());
    let ids = from_record_source(&p, &src)?.map(|r| r.id).sum()?;
    assert_eq!(ids, 6);

    // The source itself is reusable; each call builds a new stream.
    assert_eq!(from_record_source(&p, &src)?.count()?, 3);
    Ok(())
}

struct FailingSource;
impl RecordSource<Rec> for FailingSource {
    fn find_all(&self) -> Result<Vec<Rec>> {
        anyhow::bail!("backend unavailable")
    }
}

#[test]
fn failing_record_source_surfaces_its_error() {
    let p = TestPipeline::new();
    let err = from_record_source(&p, &FailingSource).err().expect("must fail");
    assert_eq!(err.to_string(), "backend unavailable");
}
