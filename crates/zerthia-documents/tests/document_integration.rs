use std::io::Write;

use zerthia_documents::{
    DocumentError, DocumentEvidence, DocumentRetriever, DocumentStore, InMemoryVectorIndex,
    IngestionPipeline, SplitterConfig, TextSplitter, VectorIndex,
};
use zerthia_llm::any::embed_fn;
use zerthia_llm::mock::MockProvider;

fn index() -> InMemoryVectorIndex {
    let mock =
        MockProvider::default().with_keyword_embeddings(&["florin", "guilder", "bread", "flour"]);
    InMemoryVectorIndex::new(embed_fn(mock))
}

fn pipeline() -> IngestionPipeline {
    IngestionPipeline::new(TextSplitter::new(SplitterConfig::default()))
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn mixed_formats_share_one_index() {
    let index = index();
    let mut store = DocumentStore::new();
    let p = pipeline();

    let n_txt = p
        .ingest(&index, &mut store, "bread.txt", b"Bread needs flour and water.".to_vec())
        .await
        .unwrap();
    let n_docx = p
        .ingest(
            &index,
            &mut store,
            "atlas.docx",
            docx(&["Florin is a kingdom.", "Its capital is Guilder City."]),
        )
        .await
        .unwrap();
    let n_csv = p
        .ingest(
            &index,
            &mut store,
            "rivers.csv",
            b"river,country\nSilver,Florin\n".to_vec(),
        )
        .await
        .unwrap();

    assert!(n_txt > 0 && n_docx > 0 && n_csv > 0);
    assert_eq!(index.len(), n_txt + n_docx + n_csv);
    assert_eq!(store.len(), 3);

    let evidence = DocumentRetriever::new(1, 1000)
        .query(&index, &store, "Where is the capital of Florin and Guilder?")
        .await;
    let DocumentEvidence::Found(text) = evidence else {
        panic!("expected evidence");
    };
    assert!(text.starts_with("Document: atlas.docx\nContent: "));
    assert!(text.contains("Guilder City"));
}

#[tokio::test]
async fn failed_upload_does_not_disturb_existing_corpus() {
    let index = index();
    let mut store = DocumentStore::new();
    let p = pipeline();
    p.ingest(&index, &mut store, "bread.txt", b"Bread needs flour.".to_vec())
        .await
        .unwrap();

    let err = p
        .ingest(&index, &mut store, "broken.docx", b"not a zip".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::Parse { .. }));
    assert_eq!(index.len(), 1);
    assert_eq!(store.len(), 1);

    let err = p
        .ingest(&index, &mut store, "slides.key", b"keynote".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::UnsupportedFormat(_)));
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn index_and_store_stay_in_step() {
    let index = index();
    let mut store = DocumentStore::new();
    assert_eq!(index.is_empty(), store.is_empty());

    pipeline()
        .ingest(&index, &mut store, "notes.txt", b"Florin.".to_vec())
        .await
        .unwrap();
    assert_eq!(index.is_empty(), store.is_empty());
    assert!(store.contains("notes.txt"));
}
