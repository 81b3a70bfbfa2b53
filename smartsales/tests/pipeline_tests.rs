use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway copy of the sample project, so every test starts from raw files.
struct SmartSalesTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl SmartSalesTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_project");

        let dest = tmp.path().join("sample_project");
        Self::copy_dir(&fixture, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.skip_exist = true;
        options.content_only = true;

        fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn smartsales(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("smartsales"));
        cmd.current_dir(&self.root);
        cmd.env_remove("SMARTSALES_WAREHOUSE")
            .env_remove("SMARTSALES_TARGET_PATH")
            .env_remove("SMARTSALES_STRICT");
        cmd
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn count_rows(&self, table: &str) -> Result<i64> {
        self.query_count(&format!("SELECT COUNT(*) FROM {}", table))
    }

    fn query_count(&self, sql: &str) -> Result<i64> {
        let conn = rusqlite::Connection::open(self.path("data/dw/smart_sales.db"))?;
        let count = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }
}

#[test]
fn test_run_builds_warehouse_and_reports() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    env.smartsales()
        .args(["run", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    for file in ["customers_data", "products_data", "sales_data"] {
        let prepared = env.path(&format!("data/prepared/{}_prepared.csv", file));
        assert!(prepared.exists(), "missing {:?}", prepared);
    }

    // One duplicate and one out-of-range customer dropped, one duplicate per other file.
    assert_eq!(env.count_rows("customer")?, 3);
    assert_eq!(env.count_rows("product")?, 4);
    assert_eq!(env.count_rows("sale")?, 4);

    let results: serde_json::Value = serde_json::from_str(&fs::read_to_string(env.path("target/run_results.json"))?)?;
    assert_eq!(results["project"], "sample_sales");
    assert_eq!(results["success"], true);
    assert_eq!(results["load"]["tables"]["sale"]["status"], "loaded");
    assert_eq!(results["report"]["lowest_revenue_day"], "Saturday");

    for goal in ["peak_sell_times", "weekday_revenue", "purchase_frequency"] {
        assert!(env.path(&format!("data/results/{}.csv", goal)).exists(), "missing {}", goal);
    }
    Ok(())
}

#[test]
fn test_aliased_sales_headers_keep_their_values() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;
    fs::write(
        env.path("data/raw/sales_data.csv"),
        "TransactionID,Date,CustomerID,ProductID,StoreID,CampaignID,SaleAmountUSD,LoyaltyPoints,MembershipStatus\n\
         550,2024-01-06,1001,101,404,0,10.5,5,Gold\n\
         551,01/07/2024,1002,102,403,0,24,12,Silver\n\
         552,2024-01-08,1003,104,404,1,13,3,Gold\n",
    )?;

    env.smartsales().args(["run", "--strict"]).assert().success();

    assert_eq!(env.count_rows("sale")?, 3);
    for column in ["sale_date", "sale_amount", "points_earned", "member_status"] {
        let nulls = env.query_count(&format!("SELECT COUNT(*) FROM sale WHERE {} IS NULL", column))?;
        assert_eq!(nulls, 0, "{} loaded as NULL", column);
    }
    assert_eq!(
        env.query_count("SELECT COUNT(*) FROM sale WHERE sale_date = '2024-01-07' AND sale_amount = 24")?,
        1
    );

    let results: serde_json::Value = serde_json::from_str(&fs::read_to_string(env.path("target/run_results.json"))?)?;
    assert_eq!(results["load"]["tables"]["sale"]["ignored_columns"], serde_json::json!([]));
    Ok(())
}

#[test]
fn test_prepare_reports_every_missing_file() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;
    fs::remove_file(env.path("data/raw/customers_data.csv"))?;
    fs::remove_file(env.path("data/raw/sales_data.csv"))?;

    env.smartsales()
        .arg("prepare")
        .assert()
        .failure()
        .stdout(predicate::str::contains("✅ products"))
        .stderr(predicate::str::contains("failed for 2 datasets"));

    assert!(env.path("data/prepared/products_data_prepared.csv").exists());
    Ok(())
}

#[test]
fn test_prepare_cleans_customers() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    env.smartsales()
        .args(["prepare", "--entity", "customers"])
        .assert()
        .success();

    let prepared = fs::read_to_string(env.path("data/prepared/customers_data_prepared.csv"))?;
    insta::assert_snapshot!(prepared, @r"
    customer_id,name,region,join_date,purchases,amount_spent
    1001,Ann,East,2023-01-05,3,500
    1002,Unknown,West,02/17/2023,1,9000
    1003,Cy,North,2023-03-01,1,5000
    ");

    assert!(!env.path("data/prepared/sales_data_prepared.csv").exists());
    Ok(())
}

#[test]
fn test_rerun_keeps_row_counts() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    env.smartsales().arg("run").assert().success();
    env.smartsales().arg("load").assert().success();

    assert_eq!(env.count_rows("customer")?, 3);
    assert_eq!(env.count_rows("sale")?, 4);
    Ok(())
}

#[test]
fn test_dangling_sale_only_fails_in_strict_mode() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    // Customer 1004 is removed as an outlier, so this sale has no parent row.
    let sales = env.path("data/raw/sales_data.csv");
    let mut raw = fs::read_to_string(&sales)?;
    raw.push_str("554,2024-01-10,1004,101,404,0,10\n");
    fs::write(&sales, raw)?;

    env.smartsales().arg("prepare").assert().success();

    env.smartsales()
        .args(["load", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("row 5"))
        .stderr(predicate::str::contains("Strict mode"));

    env.smartsales()
        .arg("load")
        .assert()
        .success()
        .stdout(predicate::str::contains("sale     4/5 rows"));
    assert_eq!(env.count_rows("sale")?, 4);

    env.smartsales()
        .args(["load", "--on-row-error", "abort-table"])
        .assert()
        .success();
    assert_eq!(env.count_rows("sale")?, 0);
    assert_eq!(env.count_rows("customer")?, 3);
    Ok(())
}

#[test]
fn test_strict_env_override() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    let sales = env.path("data/raw/sales_data.csv");
    let mut raw = fs::read_to_string(&sales)?;
    raw.push_str("554,2024-01-10,1004,101,404,0,10\n");
    fs::write(&sales, raw)?;

    env.smartsales()
        .arg("run")
        .env("SMARTSALES_STRICT", "true")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_inspect_prints_schema_and_rows() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    env.smartsales().arg("run").assert().success();

    env.smartsales()
        .args(["inspect", "--table", "customer", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("amount_spent"))
        .stdout(predicate::str::contains("Ann"))
        .stdout(predicate::str::contains("Rows: 3"));
    Ok(())
}

#[test]
fn test_inspect_before_load_fails() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;

    env.smartsales()
        .args(["inspect", "--table", "sale"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Have you run 'smartsales load'?"));
    Ok(())
}

#[test]
fn test_report_without_cube_fails() -> Result<()> {
    let env = SmartSalesTestEnv::new()?;
    fs::remove_file(env.path("data/olap_cubing_outputs/multidimensional_olap_cube.csv"))?;

    env.smartsales()
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));

    // `run` skips reporting instead.
    env.smartsales()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reporting skipped"));
    Ok(())
}

#[test]
fn test_missing_config_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().to_str().context("Non UTF-8 temp path")?;

    Command::new(assert_cmd::cargo::cargo_bin!("smartsales"))
        .args(["run", "--project-dir", dir])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No configuration file found"));
    Ok(())
}
