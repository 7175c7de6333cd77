//! Integration tests for declaring and reading configuration.
//!
//! Each test builds a configuration from an in-memory source and checks what
//! its accessors yield.

use anyhow::{Result, ensure};
use env_vars::{
    BOOL, Config, EnvError, FLOAT, INT, Options, STRING, SharedVars, Value, array, env_from,
    string_array,
};
use rstest::rstest;
use test_helpers::vars;

fn build<F>(pairs: &[(&str, &str)], setup: F) -> Result<Config, EnvError>
where
    F: FnOnce(&mut env_vars::Declarations<'static>) -> Result<(), EnvError>,
{
    env_from(vars(pairs), setup)
}

#[test]
fn mandatory_with_set_value() -> Result<()> {
    let config = build(&[("APP_NAME", "myapp")], |d| {
        d.mandatory("APP_NAME", STRING)?;
        Ok(())
    })?;
    assert_eq!(config.get("appName")?, Value::from("myapp"));
    Ok(())
}

#[test]
fn mandatory_without_value_fails_the_build() {
    let result = build(&[], |d| {
        d.mandatory("APP_NAME", STRING)?;
        Ok(())
    });
    let err = result.expect_err("missing mandatory variable");
    assert_eq!(err, EnvError::missing("APP_NAME"));
    assert_eq!(err.to_string(), "APP_NAME is not defined");
}

#[test]
fn mandatory_accepts_empty_values() -> Result<()> {
    let config = build(&[("APP_NAME", "")], |d| {
        d.mandatory("APP_NAME", STRING)?;
        Ok(())
    })?;
    assert_eq!(config.get("appName")?, Value::from(""));
    Ok(())
}

#[test]
fn optional_with_set_value() -> Result<()> {
    let config = build(&[("APP_NAME", "myapp")], |d| {
        d.optional("APP_NAME", STRING)?;
        Ok(())
    })?;
    assert_eq!(config.get("appName")?, Value::from("myapp"));
    Ok(())
}

#[rstest]
#[case(STRING)]
#[case(FLOAT)]
#[case(string_array())]
fn absent_optionals_are_null(#[case] kind: env_vars::Kind) -> Result<()> {
    let config = build(&[], |d| {
        d.optional("VALUE", kind)?;
        Ok(())
    })?;
    ensure!(config.get("value")?.is_null(), "expected null");
    Ok(())
}

#[rstest]
#[case(Value::from("myapp"))]
#[case(Value::Bool(true))]
#[case(Value::from(vec![1_i64, 2]))]
fn absent_optionals_return_the_default_uncoerced(#[case] default: Value) -> Result<()> {
    let expected = default.clone();
    let config = build(&[], |d| {
        d.optional_or("FORCE_SSL", STRING, default)?;
        Ok(())
    })?;
    assert_eq!(config.get("forceSSL")?, expected);
    Ok(())
}

#[test]
fn coerces_scalars() -> Result<()> {
    let config = build(
        &[("WAIT", "1.2"), ("TIMEOUT", "10"), ("FORCE_SSL", "yes")],
        |d| {
            d.mandatory("WAIT", FLOAT)?
                .mandatory("TIMEOUT", INT)?
                .mandatory("FORCE_SSL", BOOL)?;
            Ok(())
        },
    )?;
    assert_eq!(config.get_as::<f64>("wait")?, 1.2);
    assert_eq!(config.get_as::<i64>("timeout")?, 10);
    ensure!(config.get_as::<bool>("forceSSL")?, "expected forceSSL");
    Ok(())
}

#[rstest]
#[case("yes", true)]
#[case("true", true)]
#[case("1", true)]
#[case("no", false)]
#[case("false", false)]
#[case("0", false)]
fn coerces_bools(#[case] raw: &str, #[case] expected: bool) -> Result<()> {
    let config = build(&[("FORCE_SSL", raw)], |d| {
        d.mandatory("FORCE_SSL", BOOL)?;
        Ok(())
    })?;
    assert_eq!(config.get("forceSSL")?, Value::Bool(expected));
    Ok(())
}

#[rstest]
#[case("a, b, c")]
#[case("a,b,c")]
fn coerces_arrays(#[case] raw: &str) -> Result<()> {
    let config = build(&[("CHARS", raw)], |d| {
        d.mandatory("CHARS", string_array())?;
        Ok(())
    })?;
    assert_eq!(config.get_as::<Vec<String>>("chars")?, ["a", "b", "c"]);
    Ok(())
}

#[test]
fn coerces_array_items() -> Result<()> {
    let config = build(&[("NUMBERS", "1.1,1.2,1.3")], |d| {
        d.mandatory("NUMBERS", array(FLOAT))?;
        Ok(())
    })?;
    assert_eq!(config.get_as::<Vec<f64>>("numbers")?, vec![1.1, 1.2, 1.3]);
    Ok(())
}

#[rstest]
#[case(INT, EnvError::invalid_integer("invalid"))]
#[case(FLOAT, EnvError::invalid_float("invalid"))]
fn invalid_numbers_fail_on_read(
    #[case] kind: env_vars::Kind,
    #[case] expected: EnvError,
) -> Result<()> {
    let config = build(&[("TIMEOUT", "invalid")], |d| {
        d.mandatory("TIMEOUT", kind)?;
        Ok(())
    })?;
    assert_eq!(config.get("timeout"), Err(expected.clone()));
    assert_eq!(config.get("timeout"), Err(expected));
    Ok(())
}

#[rstest]
#[case(INT, "8080", Value::Int(8080))]
#[case(FLOAT, "0.5", Value::Float(0.5))]
#[case(BOOL, "yes", Value::Bool(true))]
#[case(array(INT), "1, 2", Value::from(vec![1_i64, 2]))]
fn repeated_reads_agree(
    #[case] kind: env_vars::Kind,
    #[case] raw: &str,
    #[case] expected: Value,
) -> Result<()> {
    let config = build(&[("SETTING", raw)], |d| {
        d.mandatory("SETTING", kind)?;
        Ok(())
    })?;
    let first = config.get("setting")?;
    let second = config.get("setting")?;
    assert_eq!(first, expected);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn aliases_share_the_declaration() -> Result<()> {
    let config = build(&[("NODE_ENV", "production")], |d| {
        d.mandatory_with("NODE_ENV", STRING, Options::new().alias("env"))?;
        Ok(())
    })?;
    assert_eq!(config.get("nodeEnv")?, Value::from("production"));
    assert_eq!(config.get("env")?, Value::from("production"));
    Ok(())
}

#[test]
fn optional_aliases_share_the_default() -> Result<()> {
    let config = build(&[], |d| {
        d.optional_with(
            "DATABASE_URL",
            STRING,
            "postgres://localhost",
            Options::with_aliases(["db", "database"]),
        )?;
        Ok(())
    })?;
    for name in ["databaseURL", "db", "database"] {
        assert_eq!(config.get(name)?, Value::from("postgres://localhost"));
    }
    Ok(())
}

#[test]
fn all_caps_variables_are_lower_cased() -> Result<()> {
    let config = build(&[("TZ", "Etc/UTC")], |d| {
        d.mandatory("TZ", STRING)?;
        Ok(())
    })?;
    assert_eq!(config.get("tz")?, Value::from("Etc/UTC"));
    ensure!(!config.contains("TZ"), "TZ is not a default acronym");
    Ok(())
}

#[test]
fn default_acronyms_stay_upper_case() -> Result<()> {
    let config = build(&[], |d| {
        for acronym in env_vars::DEFAULT_ACRONYMS {
            d.optional_or(&format!("PREFIX_{acronym}_SUFFIX"), STRING, *acronym)?;
        }
        Ok(())
    })?;
    for acronym in env_vars::DEFAULT_ACRONYMS {
        assert_eq!(
            config.get(&format!("prefix{acronym}Suffix"))?,
            Value::from(*acronym)
        );
    }
    Ok(())
}

#[test]
fn properties_are_computed_on_each_read() -> Result<()> {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicI64::new(0));
    let reads = std::sync::Arc::clone(&counter);
    let config = build(&[], move |d| {
        d.property("number", || 1234_i64)?;
        d.property("reads", move || {
            reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1
        })?;
        Ok(())
    })?;
    assert_eq!(config.get("number")?, Value::Int(1234));
    assert_eq!(config.get("reads")?, Value::Int(1));
    assert_eq!(config.get("reads")?, Value::Int(2));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn properties_may_read_the_configuration() -> Result<()> {
    let slot = std::sync::Arc::new(std::sync::OnceLock::<Config>::new());
    let handle = std::sync::Arc::clone(&slot);
    let config = build(&[("HOST", "example.com"), ("PORT", "8080")], move |d| {
        d.mandatory("HOST", STRING)?.mandatory("PORT", INT)?;
        d.property("address", move || {
            handle.get().map_or(Value::Null, |config| {
                match (config.get_as::<String>("host"), config.get_as::<i64>("port")) {
                    (Ok(host), Ok(port)) => Value::from(format!("{host}:{port}")),
                    _ => Value::Null,
                }
            })
        })?;
        Ok(())
    })?;
    ensure!(slot.set(config.clone()).is_ok(), "slot already filled");
    assert_eq!(config.get("address")?, Value::from("example.com:8080"));
    Ok(())
}

#[test]
fn reads_follow_the_live_source() -> Result<()> {
    let source = SharedVars::from_pairs([("TIMEOUT", "10")]);
    let config = env_from(source.clone(), |d| {
        d.mandatory("TIMEOUT", INT)?;
        d.optional_or("RETRIES", INT, 3_i64)?;
        Ok(())
    })?;
    assert_eq!(config.get("timeout")?, Value::Int(10));
    assert_eq!(config.get("retries")?, Value::Int(3));

    source.set("TIMEOUT", "20");
    source.set("RETRIES", "5");
    assert_eq!(config.get("timeout")?, Value::Int(20));
    assert_eq!(config.get("retries")?, Value::Int(5));

    source.remove("TIMEOUT");
    source.set("RETRIES", "many");
    ensure!(config.get("timeout")?.is_null(), "removed mandatory reads null");
    assert_eq!(config.get("retries"), Err(EnvError::invalid_integer("many")));
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> Result<()> {
    let config = build(&[], |d| {
        d.property("number", || 1234_i64)?;
        Ok(())
    })?;
    let err = config.get("missing").expect_err("missing is not declared");
    assert_eq!(err.to_string(), "\"missing\" is not a registered configuration.");
    Ok(())
}

#[rstest]
#[case("prop")]
#[case("number")]
fn assignments_are_rejected(#[case] name: &str) -> Result<()> {
    let config = build(&[], |d| {
        d.property("number", || 1234_i64)?;
        Ok(())
    })?;
    let err = config
        .try_set(name, &Value::Int(1))
        .expect_err("configuration is read-only");
    assert_eq!(err, EnvError::read_only(name));
    assert_eq!(
        err.to_string(),
        format!("Configuration is read-only (\"{name}\" was assigned).")
    );
    assert_eq!(config.get("number")?, Value::Int(1234));
    Ok(())
}

#[test]
fn repeated_variables_fail_the_build() {
    let result = build(&[], |d| {
        d.optional("PORT", INT)?;
        d.optional("PORT", INT)?;
        Ok(())
    });
    assert_eq!(result.map(|_| ()), Err(EnvError::duplicate_key("port")));
}

#[test]
fn aliases_cannot_shadow_derived_names() {
    let result = build(&[], |d| {
        d.optional_with("SERVER_PORT", INT, None::<i64>, Options::new().alias("port"))?;
        d.optional("PORT", INT)?;
        Ok(())
    });
    assert_eq!(result.map(|_| ()), Err(EnvError::duplicate_key("port")));
}

#[test]
fn property_names_cannot_shadow_variables() {
    let result = build(&[("PORT", "1")], |d| {
        d.mandatory("PORT", INT)?;
        d.property("port", || 2_i64)?;
        Ok(())
    });
    assert_eq!(result.map(|_| ()), Err(EnvError::duplicate_key("port")));
}

#[test]
fn an_alias_equal_to_the_derived_name_installs_once() -> Result<()> {
    let config = build(&[("PORT", "1")], |d| {
        d.mandatory_with("PORT", INT, Options::new().alias("port"))?;
        Ok(())
    })?;
    assert_eq!(config.get("port")?, Value::Int(1));
    Ok(())
}

#[test]
fn empty_names_fail_the_build() {
    let result = build(&[], |d| {
        d.property("", || 1_i64)?;
        Ok(())
    });
    assert_eq!(result.map(|_| ()), Err(EnvError::EmptyName));
}

#[test]
fn typed_reads_report_mismatches() -> Result<()> {
    let config = build(&[("PORT", "80")], |d| {
        d.mandatory("PORT", INT)?;
        Ok(())
    })?;
    assert_eq!(
        config.get_as::<String>("port"),
        Err(EnvError::TypeMismatch {
            expected: "string",
            found: "int"
        })
    );
    Ok(())
}
