#![allow(dead_code)]
mod config;
mod db;
mod utils;

use std::env;

use color_eyre::Result;
use dotenv::dotenv;
use getopts::Options;
use log::{info, warn};

// I think we have to add crate here because
// of the other crate named "config" that we
// use as a dependency.
use crate::config::Config;
use crate::db::entities::{ArticleStatus, NewArticle};
use crate::db::ArticleRepository;

// Copy pasted this from getopts doc.
fn print_usage(program: &str, opts: Options) {
  let brief = format!("Usage: {} [options]", program);
  print!("{}", opts.usage(&brief));
}

/**
 * Database bootstrap binary: makes sure the schema exists,
 * seeds the sample articles and reports repository statistics.
 * Safe to run against a non-empty database, slug collisions
 * resolve themselves with numbered suffixes.
 */
fn main() -> Result<()> {
  dotenv().ok();
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optflag("f", "force", "Seed sample content even when articles already exist");
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(&args[1..])?;
  if opt_matches.opt_present("h") {
    print_usage(&program, opts);
    return Ok(());
  }

  let config = Config::from_env()
    .expect("Configuration (environment or .env file) is missing");

  let repository = ArticleRepository::open(&config.db_path, &config.schema_path)?;

  let stats = repository.get_stats()?;
  if stats.total_articles > 0 && !opt_matches.opt_present("f") {
    warn!(
      "Database already contains {} articles, skipping sample content (use --force to seed anyway)",
      stats.total_articles
    );
  } else {
    seed_sample_articles(&repository)?;
  }

  let stats = repository.get_stats()?;
  info!(
    "Database statistics:\n{}",
    serde_json::to_string_pretty(&stats)?
  );

  let articles = repository.recent_articles(5)?;
  info!("Recent articles:");
  for article in &articles {
    info!("- {} ({})", article.title, article.slug);
  }

  Ok(())
}

fn seed_sample_articles(repository: &ArticleRepository) -> Result<()> {
  let samples = vec![
    NewArticle {
      title: "AI's Next Frontier Isn't Intelligence, It's Context".to_string(),
      subtitle: Some(
        "Why the most brilliant AI tools are like overwhelmed project managers \
        losing the plot".to_string(),
      ),
      excerpt: Some(
        "The real challenge for AI is no longer about raw intelligence, it's \
        about perfect contextual recall.".to_string(),
      ),
      content: "Here's the thing about AI as we head into the fall of 2025: the \
        most brilliant tools in the world are like overwhelmed project managers.\n\n\
        You've felt this. You spend two hours briefing an AI agent on a complex \
        project, detailing stakeholders, goals, and constraints. It performs \
        brilliantly. The next day, you ask it to draft an email based on \
        'yesterday's key objectives,' and it returns something generic, having \
        lost the crucial, nuanced details from the middle of your conversation.\n\n\
        This isn't an annoying glitch; it's a pattern that became painfully clear \
        during the big agent rollouts this past summer, revealing the next major \
        race in technology. The real challenge for AI is no longer about raw \
        intelligence, it's about perfect contextual recall.".to_string(),
      tags: vec![
        "AI Context".to_string(),
        "Memory".to_string(),
        "Claude".to_string(),
        "ChatGPT".to_string(),
        "Gemini".to_string(),
        "Analysis".to_string(),
      ],
      categories: vec!["Analysis".to_string()],
      featured: true,
      ai_sources: Some(vec![
        "Claude 3.5".to_string(),
        "GPT-4".to_string(),
        "Gemini Pro".to_string(),
      ]),
      meta_description: Some(
        "Why AI loses context and how the battle for perfect recall will define \
        the next era".to_string(),
      ),
      status: ArticleStatus::Published,
      ..NewArticle::default()
    },
    NewArticle {
      title: "Understanding Large Language Models: A Beginner's Guide".to_string(),
      subtitle: Some(
        "Breaking down how AI actually 'thinks' without the technical jargon".to_string(),
      ),
      excerpt: Some(
        "LLMs don't actually understand language the way humans do, they're \
        sophisticated pattern-matching machines.".to_string(),
      ),
      content: "Large Language Models (LLMs) like ChatGPT, Claude, and Gemini \
        have become household names, but how do they actually work?\n\n\
        At their core, LLMs are massive neural networks trained on enormous \
        amounts of text data. They learn patterns in language by analyzing \
        billions of examples, developing an intricate understanding of how words \
        and concepts relate to each other.\n\n\
        But here's the crucial point: LLMs don't actually 'understand' language \
        the way humans do. They're sophisticated pattern-matching machines that \
        have learned to predict what words should come next based on context.\n\n\
        Think of it like an incredibly well-read person who has memorized \
        millions of conversations and can cleverly recombine them, but without \
        truly understanding the meaning behind the words.".to_string(),
      tags: vec![
        "LLM".to_string(),
        "Tutorial".to_string(),
        "Beginner".to_string(),
        "AI Fundamentals".to_string(),
      ],
      categories: vec!["AI Fundamentals".to_string(), "Tutorials".to_string()],
      featured: false,
      ai_sources: Some(vec!["Claude 3.5".to_string()]),
      meta_description: Some(
        "Learn how Large Language Models work in plain English".to_string(),
      ),
      status: ArticleStatus::Published,
      ..NewArticle::default()
    },
    NewArticle {
      title: "The Alignment Problem: Why Teaching AI What We Want Is Harder \
        Than It Seems".to_string(),
      subtitle: Some(
        "Exploring the challenge of ensuring AI systems pursue intended goals".to_string(),
      ),
      excerpt: Some(
        "The alignment problem isn't just about preventing AI from becoming \
        evil, it's about the subtle ways AI can misinterpret our intentions.".to_string(),
      ),
      content: "The alignment problem is one of the most important challenges \
        in AI development, yet it's often misunderstood.\n\n\
        At its simplest, alignment is about ensuring AI systems do what we \
        actually want them to do. This sounds straightforward, but it's \
        surprisingly complex.\n\n\
        Consider a simple example: You ask an AI to 'make you happy.' A poorly \
        aligned AI might interpret this literally and try to manipulate your \
        brain chemistry directly. A well-aligned AI would understand the \
        implicit constraints and values behind your request.\n\n\
        The challenge becomes exponentially more complex as AI systems become \
        more capable. How do we ensure that powerful AI systems remain aligned \
        with human values when those values themselves are complex, \
        contradictory, and constantly evolving?".to_string(),
      tags: vec![
        "AI Safety".to_string(),
        "Alignment".to_string(),
        "Ethics".to_string(),
        "Advanced".to_string(),
      ],
      categories: vec!["AI Safety".to_string(), "Analysis".to_string()],
      featured: false,
      ai_sources: Some(vec!["Claude 3.5".to_string(), "GPT-4".to_string()]),
      meta_description: Some(
        "Understanding the AI alignment problem and why it matters for the \
        future".to_string(),
      ),
      status: ArticleStatus::Published,
      ..NewArticle::default()
    },
  ];

  for sample in &samples {
    let article_id = repository.create_article(sample)?;
    info!("Created article: {} (ID: {})", sample.title, article_id);
  }
  Ok(())
}
