//! 収集した投稿を Parquet ファイルへ書き出す
//!
//! 列: text, created_at, author_handle, author_display_name, uri, tags,
//! like_count, repost_count, reply_count, quote_count

mod error;

pub use error::ArchiveError;

use arrow::array::{ArrayRef, ListBuilder, StringArray, StringBuilder, UInt64Array};
use arrow::record_batch::RecordBatch;
use bsky_core::Post;
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

/// 投稿列を 1 行 1 投稿の RecordBatch に変換する (順序はそのまま)
pub fn to_record_batch(posts: &[Post]) -> Result<RecordBatch, ArchiveError> {
    let mut tags = ListBuilder::new(StringBuilder::new());
    for post in posts {
        match post.tags() {
            Some(values) => {
                for tag in values {
                    tags.values().append_value(tag);
                }
                tags.append(true);
            }
            None => tags.append_null(),
        }
    }

    let display_names: Vec<Option<&str>> =
        posts.iter().map(|p| p.author_display_name()).collect();

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("text", strings(posts, Post::text)),
        ("created_at", strings(posts, Post::created_at)),
        ("author_handle", strings(posts, Post::author_handle)),
        (
            "author_display_name",
            Arc::new(StringArray::from(display_names)) as ArrayRef,
        ),
        ("uri", strings(posts, Post::uri)),
        ("tags", Arc::new(tags.finish()) as ArrayRef),
        ("like_count", counts(posts, Post::like_count)),
        ("repost_count", counts(posts, Post::repost_count)),
        ("reply_count", counts(posts, Post::reply_count)),
        ("quote_count", counts(posts, Post::quote_count)),
    ];

    Ok(RecordBatch::try_from_iter(columns)?)
}

fn strings(posts: &[Post], field: fn(&Post) -> &str) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(posts.iter().map(field)))
}

fn counts(posts: &[Post], field: fn(&Post) -> u64) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(posts.iter().map(field)))
}

/// Parquet として保存する。親ディレクトリがなければ作る。空の入力はエラー。
pub fn save_to_parquet(posts: &[Post], output_path: impl AsRef<Path>) -> Result<(), ArchiveError> {
    if posts.is_empty() {
        return Err(ArchiveError::Empty);
    }

    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArchiveError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let batch = to_record_batch(posts)?;

    let file = File::create(output_path).map_err(|source| ArchiveError::Io {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    tracing::debug!("Wrote {} rows to {}", posts.len(), output_path.display());
    Ok(())
}
