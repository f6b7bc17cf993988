use jobscout_core::parse_url_batch;

#[test]
fn takes_first_url_cell_per_row() {
    let batch = parse_url_batch(
        "name,https://www.indeed.com/viewjob?jk=a\nhttps://www.indeed.com/viewjob?jk=b,ignored\n",
    );
    assert_eq!(
        batch.urls,
        vec![
            "https://www.indeed.com/viewjob?jk=a",
            "https://www.indeed.com/viewjob?jk=b"
        ]
    );
    assert_eq!(batch.dropped_rows, 0);
}

#[test]
fn rows_without_urls_are_dropped_not_fatal() {
    let batch = parse_url_batch("title,company\nhttps://www.indeed.com/viewjob?jk=a\n42,oops\n");
    assert_eq!(batch.urls.len(), 1);
    assert_eq!(batch.dropped_rows, 2);
}

#[test]
fn blank_lines_are_ignored_entirely() {
    let batch = parse_url_batch("\n\nhttps://www.indeed.com/viewjob?jk=a\n   \n");
    assert_eq!(batch.urls.len(), 1);
    assert_eq!(batch.dropped_rows, 0);
}

#[test]
fn semicolon_suffix_is_stripped() {
    let batch = parse_url_batch("https://www.indeed.com/viewjob?jk=a;extra;stuff\n");
    assert_eq!(batch.urls, vec!["https://www.indeed.com/viewjob?jk=a"]);
}

#[test]
fn empty_input_yields_empty_batch() {
    let batch = parse_url_batch("");
    assert!(batch.is_empty());
    assert_eq!(batch.dropped_rows, 0);
}
