use anyhow::Result;
use ironstream::testing::*;
use ironstream::*;
use std::collections::BTreeSet;

#[test]
fn average_age_of_florida_men() -> Result<()> {
    let p = TestPipeline::new();
    let avg = from_vec(&p, sample_contacts())
        .filter(|c| c.is_in_state("FL"))
        .filter(|c| c.gender == Some(Gender::Male))
        .map(|c| c.age)
        .average()?;
    assert_eq!(avg, Some(40.0));
    Ok(())
}

#[test]
fn average_of_an_empty_selection_is_absent() -> Result<()> {
    let p = TestPipeline::new();
    let avg = from_vec(&p, sample_contacts())
        .filter(|c| c.is_in_state("WA"))
        .map(|c| c.age)
        .average()?;
    assert_eq!(avg, None);
    Ok(())
}

#[test]
fn same_query_in_parallel() -> Result<()> {
    let p = TestPipeline::new();
    let avg = from_vec(&p, sample_contacts())
        .parallel_with(None, Some(2))
        .filter(|c| c.is_in_state("FL") && c.gender == Some(Gender::Male))
        .map(|c| c.age)
        .average()?;
    assert_eq!(avg, Some(40.0));
    Ok(())
}

#[test]
fn oldest_and_youngest() -> Result<()> {
    let p = TestPipeline::new();
    let oldest = from_vec(&p, sample_contacts()).max_by(|a, b| a.age.cmp(&b.age))?;
    assert_eq!(oldest.map(|c| c.name), Some("Patricia Moore".to_string()));

    let youngest = from_vec(&p, sample_contacts()).min_by(|a, b| a.age.cmp(&b.age))?;
    assert_eq!(youngest.map(|c| c.name), Some("Michael Miller".to_string()));
    Ok(())
}

#[test]
fn states_and_emails() -> Result<()> {
    let p = TestPipeline::new();
    let states = from_vec(&p, sample_contacts())
        .map(|c| c.state.clone())
        .to_btree_set()?;
    let expected: BTreeSet<String> = ["CA", "FL", "NY", "TX"].iter().map(ToString::to_string).collect();
    assert_eq!(states, expected);

    let emails = from_vec(&p, sample_contacts())
        .filter(|c| c.is_in_state("TX"))
        .map(|c| c.email.clone())
        .joining_with("; ", "To: ", "")?;
    assert_eq!(emails, "To: susan.clark@example.com; mark.lewis@example.com");
    Ok(())
}

#[test]
fn index_by_name() -> Result<()> {
    let p = TestPipeline::new();
    let by_name = from_vec(&p, sample_contacts()).to_map(|c| c.name.clone(), |c| c.city.clone())?;
    assert_eq!(by_name.get("David Taylor").map(String::as_str), Some("Albany"));

    // Several contacts share a state, so keying by state is a fault.
    let err = from_vec(&p, sample_contacts())
        .to_map(|c| c.state.clone(), |c| c.name.clone())
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<StreamError>(), Some(StreamError::DuplicateKey(_))));
    Ok(())
}

#[test]
fn sorted_by_birthday_then_names() -> Result<()> {
    let p = TestPipeline::new();
    let names = from_vec(&p, sample_contacts())
        .sorted_by(|a, b| a.birthday.cmp(&b.birthday))
        .limit(3)
        .map(|c| c.name.clone())
        .to_vec()?;
    assert_eq!(names, vec!["Patricia Moore", "James Wilson", "David Taylor"]);
    Ok(())
}

#[test]
fn empty_contact_has_no_state() {
    let c = Contact::default();
    assert!(c.is_in_state(""));
    assert_eq!(c.gender, None);
}
