// src/common/upload.rs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::common::error::AppError;

// Guarda o arquivo temporário de um upload pelo tempo de vida da requisição.
// O Drop apaga o arquivo em qualquer caminho de saída do handler: sucesso, cada
// rejeição de validação, erro inesperado ou panic em unwind.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    original_name: String,
    extension: String,
}

impl TempUpload {
    // Grava os bytes recebidos no multipart em um arquivo temporário próprio,
    // preservando a extensão original para o parser decidir o formato.
    pub async fn persist(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<Self, AppError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("")
            .to_ascii_lowercase();

        let filename = if extension.is_empty() {
            format!("upload-{}", Uuid::new_v4())
        } else {
            format!("upload-{}.{}", Uuid::new_v4(), extension)
        };

        let path = dir.join(filename);
        tokio::fs::write(&path, bytes).await?;

        Ok(Self {
            path,
            original_name: original_name.to_owned(),
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Extensão já em minúsculas, sem o ponto ("csv", "xlsx", ...)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    // Nome que o cliente deu ao arquivo, gravado no lote
    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Falha ao remover arquivo temporário {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_is_written_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let upload = TempUpload::persist(dir.path(), "leads.csv", b"FirstName,Phone\nAna,123\n")
            .await
            .unwrap();
        let path = upload.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(upload.extension(), "csv");
        assert_eq!(upload.original_name(), "leads.csv");

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn file_is_removed_when_processing_bails_early() {
        let dir = tempfile::tempdir().unwrap();

        async fn fails_midway(dir: &Path) -> Result<(), AppError> {
            let _upload = TempUpload::persist(dir, "leads.xlsx", b"not really a workbook").await?;
            Err(AppError::NoValidData)
        }

        assert!(fails_midway(dir.path()).await.is_err());

        // Nenhum resto de upload pode sobrar no diretório
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn extension_is_lowercased_and_optional() {
        let dir = tempfile::tempdir().unwrap();

        let upper = TempUpload::persist(dir.path(), "LEADS.XLSX", b"x").await.unwrap();
        assert_eq!(upper.extension(), "xlsx");

        let none = TempUpload::persist(dir.path(), "leads", b"x").await.unwrap();
        assert_eq!(none.extension(), "");
    }
}
