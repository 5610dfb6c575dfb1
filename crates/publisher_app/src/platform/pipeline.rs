use std::sync::Arc;

use anyhow::Context;
use publisher_engine::{
    AudioAcquirer, AudioRequest, LogProgressSink, MetadataResolver, Publisher, WebDriverLauncher,
    YtDlp,
};
use publisher_logging::publish_info;

use super::config::AppConfig;
use super::persistence::EpisodeFile;

/// Resolves the episode, downloads its audio and publishes it.
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let mut file = EpisodeFile::load(&config.episode_file)?;
    publish_info!("Processing: {}", file.id);

    let ytdlp = YtDlp::new(config.ytdlp.clone());
    let mut episode = ytdlp
        .resolve(&file.id)
        .await
        .context("failed to resolve video metadata")?;
    publish_info!("title: {}", episode.title);
    publish_info!("description: {}", episode.description);

    if let Some(date) = file.publish_date_override()? {
        publish_info!("Publish date overridden to {}", date.display());
        episode.upload_date = date;
    }

    file.record_metadata(&episode);
    file.save(&config.episode_file)?;

    let publish = &config.publish;
    let request = AudioRequest {
        output_file: publish.audio_file.clone(),
        audio_format: config.audio_format.clone(),
        postprocessor_args: config.postprocessor_args.clone(),
        thumbnail_file: publish
            .load_thumbnail
            .then(|| publish.thumbnail_file.clone()),
    };
    ytdlp
        .acquire(&file.id, &request)
        .await
        .context("failed to download audio")?;

    let publisher = Publisher::new(
        Arc::new(WebDriverLauncher::new(config.webdriver.clone())),
        Arc::new(LogProgressSink),
    );
    publisher.publish(publish, &episode).await?;
    publish_info!("Yay");
    Ok(())
}
