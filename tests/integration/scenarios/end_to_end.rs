use crate::helpers::{client::cli_args, mock_server::MockServer};
use archive::ArchiveError;
use arrow::array::{Array, StringArray};
use bluesky_collector::{cli::Cli, error::AppError, run};
use clap::Parser;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

/// 観点: ログインから Parquet 保存まで通しで動く
#[tokio::test]
async fn test_run_keywords_writes_parquet() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("raw").join("posts.parquet");
    let output_str = output.to_str().unwrap();

    let cli = Cli::try_parse_from(cli_args(
        &server,
        &["keywords", "btc", "eth", "--output", output_str],
    ))
    .unwrap();

    let summary = run(cli).await.unwrap();
    assert_eq!(summary.posts, 4);
    assert_eq!(summary.output, output);

    let file = std::fs::File::open(&output).unwrap();
    let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batch = reader.next().unwrap().unwrap();
    assert_eq!(batch.num_rows(), 4);

    let handles = batch
        .column_by_name("author_handle")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(handles.value(0), "btc-1.test");
    assert_eq!(handles.value(3), "eth-1.test");
}

/// 観点: 1 件も集まらなかった場合は保存せずにエラーで終わる
#[tokio::test]
async fn test_run_with_no_posts_fails() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("posts.parquet");

    let cli = Cli::try_parse_from(cli_args(
        &server,
        &["keywords", "broken", "--output", output.to_str().unwrap()],
    ))
    .unwrap();

    let err = run(cli).await.unwrap_err();
    assert!(matches!(err, AppError::Archive(ArchiveError::Empty)));
    assert!(!output.exists());
}

/// 観点: パスワードが違えばログインで失敗する
#[tokio::test]
async fn test_run_with_wrong_password_fails() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("posts.parquet");

    let mut args = cli_args(&server, &["all", "--output", output.to_str().unwrap()]);
    let pw = args.iter().position(|a| a == "--password").unwrap();
    args[pw + 1] = "wrong".to_string();

    let cli = Cli::try_parse_from(args).unwrap();
    let err = run(cli).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
    assert!(server.search_requests().is_empty());
}
