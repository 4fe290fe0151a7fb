use quiz_core::model::{Difficulty, Question, QuestionBank, TopicId, TopicSummary};
use storage::json::{JsonQuizRepository, MANIFEST_FILE, write_catalog};
use storage::repository::{QuizRepository, StorageError};

fn question(prompt: &str, correct: u8) -> Question {
    Question::new(
        prompt,
        vec!["w".into(), "x".into(), "y".into(), "z".into()],
        correct,
        "",
    )
    .unwrap()
}

#[tokio::test]
async fn written_catalog_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let easy = Difficulty::new("easy").unwrap();
    let bank = QuestionBank::new().with_set(easy.clone(), vec![question("One?", 0), question("Two?", 3)]);
    let summary = TopicSummary {
        id: TopicId::new("trivia").unwrap(),
        display_name: "Trivia".into(),
        description: "Bits and bobs".into(),
    };
    write_catalog(dir.path(), &[(summary.clone(), bank.clone())])
        .await
        .unwrap();

    let repo = JsonQuizRepository::new(dir.path());
    assert_eq!(repo.list_topics().await.unwrap(), vec![summary.clone()]);
    assert_eq!(repo.load_questions(&summary.id).await.unwrap(), bank);
}

#[tokio::test]
async fn hand_written_files_use_catalog_layout() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(MANIFEST_FILE),
        r#"{"available":[{"id":"history","name":"History","description":"Dates","file":"hist.json"}]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("hist.json"),
        r#"{"medium":[{"question":"Year of the moon landing?","answers":["1965","1969","1972","1959"],"correct":1,"explanation":"Apollo 11."}]}"#,
    )
    .unwrap();

    let repo = JsonQuizRepository::new(dir.path());
    let topics = repo.list_topics().await.unwrap();
    assert_eq!(topics[0].display_name, "History");

    let bank = repo.load_questions(&topics[0].id).await.unwrap();
    let medium = bank.questions(&Difficulty::new("medium").unwrap()).unwrap();
    assert_eq!(medium[0].answer(medium[0].correct()), "1969");
}

#[tokio::test]
async fn unknown_topic_and_missing_catalog_are_distinguished() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonQuizRepository::new(dir.path());
    assert!(matches!(
        repo.list_topics().await.unwrap_err(),
        StorageError::NotFound
    ));

    write_catalog(dir.path(), &[]).await.unwrap();
    let missing = TopicId::new("nope").unwrap();
    assert!(matches!(
        repo.load_questions(&missing).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn malformed_topic_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(MANIFEST_FILE),
        r#"{"available":[{"id":"bad","name":"Bad","file":"bad.json"}]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        r#"{"easy":[{"question":"Q","answers":["a","b","c","d"],"correct":7}]}"#,
    )
    .unwrap();

    let repo = JsonQuizRepository::new(dir.path());
    let err = repo
        .load_questions(&TopicId::new("bad").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
