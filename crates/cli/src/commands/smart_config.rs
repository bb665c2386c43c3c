use crate::di::AppContext;

pub async fn run(ctx: &AppContext, limit: i64) -> anyhow::Result<()> {
    let use_case = ctx.generate_smart_config_use_case();
    let specs = use_case.execute(limit).await?;
    println!("{}", serde_json::to_string_pretty(&specs)?);
    Ok(())
}
