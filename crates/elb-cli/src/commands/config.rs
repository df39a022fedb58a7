use std::path::Path;

use anyhow::{Context, Result, bail};
use elb_core::AuditConfig;

pub fn init(path: &str, lb_group_id: Option<&str>, force: bool) -> Result<()> {
    let output = Path::new(path);
    if output.exists() && !force {
        bail!("{} already exists; pass --force to overwrite it", output.display());
    }

    let config = AuditConfig::scaffold(lb_group_id);
    std::fs::write(output, config.to_toml_string()?)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("✓ Generated {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elb-sanity.toml");

        init(path.to_str().unwrap(), Some("sg-843f59ed"), false).unwrap();

        let config = AuditConfig::from_file(&path).unwrap();
        assert_eq!(config, AuditConfig::scaffold(Some("sg-843f59ed")));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elb-sanity.toml");
        std::fs::write(&path, "names = [\"keep\"]\n").unwrap();

        assert!(init(path.to_str().unwrap(), None, false).is_err());
        let kept = AuditConfig::from_file(&path).unwrap();
        assert_eq!(kept.names, vec!["keep"]);

        init(path.to_str().unwrap(), None, true).unwrap();
        assert_eq!(AuditConfig::from_file(&path).unwrap(), AuditConfig::default());
    }
}
