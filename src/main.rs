use bookery::config::DEFAULT_CONFIG_PATH;
use bookery::epub::{self, Epub};
use bookery::{LibraryStore, ProgressStore, ReaderConfig, ReaderSession, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 📚 Bookery - EPUB导入与分页阅读工具
#[derive(Parser)]
#[command(name = "bookery")]
#[command(about = "导入EPUB文件并按进度查看分页内容")]
#[command(version)]
struct Args {
    /// EPUB文件路径
    #[arg(help = "要处理的EPUB文件路径")]
    epub_file: PathBuf,

    /// 配置文件路径
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, help = "YAML配置文件路径")]
    config: PathBuf,

    /// 生成默认配置文件
    #[arg(long, help = "在--config指定的位置生成默认配置文件")]
    init_config: bool,

    /// 缓存目录
    #[arg(long, default_value = ".bookery", help = "封面等缓存文件所在目录")]
    cache_dir: PathBuf,

    /// 详细输出模式
    #[arg(short, long, help = "输出调试日志")]
    verbose: bool,

    /// 显示元数据信息
    #[arg(short, long, help = "显示导入得到的书目信息")]
    metadata: bool,

    /// 显示章节列表
    #[arg(short, long, help = "显示过滤后的章节列表")]
    chapters: bool,

    /// 阅读进度
    #[arg(short, long, help = "阅读进度(0到1)，不指定时使用进度文件中的记录")]
    progress: Option<f64>,

    /// 显示当前页
    #[arg(long, help = "显示进度所在的页面内容")]
    page: bool,

    /// 每页字符数
    #[arg(long, help = "每页字符数，覆盖配置文件")]
    chars_per_page: Option<usize>,

    /// 书库文件
    #[arg(long, help = "将书目信息写入该JSON书库文件")]
    library: Option<PathBuf>,

    /// 进度文件
    #[arg(long, help = "读取/保存阅读进度的JSON文件")]
    progress_store: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        "bookery=debug"
    } else {
        "bookery=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("📚 Bookery - EPUB导入与分页阅读工具");

    if let Err(e) = run(&args) {
        eprintln!("❌ 错误: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if args.init_config {
        ReaderConfig::generate_default_config(&args.config)?;
        println!("📝 已生成默认配置文件: {}", args.config.display());
    }

    let mut config = ReaderConfig::load_or_default(&args.config)?;
    if let Some(chars_per_page) = args.chars_per_page {
        config.chars_per_page = chars_per_page;
    }

    println!("正在检查EPUB文件: {}", args.epub_file.display());

    if args.verbose {
        display_entries(&args.epub_file)?;
    }

    let book = epub::try_ingest(&args.epub_file, &args.cache_dir, &config)?;

    if args.metadata {
        println!("\n📊 书目信息:");
        println!("  🆔 ID: {}", book.id);
        println!("  📖 标题: {}", book.title);
        println!("  ✍️  作者: {}", book.author);
        println!("  🌐 语言: {}", book.language);
        match &book.cover_path {
            Some(cover) => println!("  🖼️  封面: {}", cover),
            None => println!("  🖼️  封面: 无"),
        }
    }

    if let Some(library) = &args.library {
        let books = LibraryStore::new(library).upsert(book.clone())?;
        println!("\n📚 书库已更新: {} ({} 本书)", library.display(), books.len());
    }

    if !(args.chapters || args.page || args.progress.is_some()) {
        return Ok(());
    }

    let mut progress_store = args.progress_store.as_deref().map(ProgressStore::open);
    let stored = match (args.progress, &progress_store) {
        (Some(fraction), _) => fraction,
        (None, Some(store)) => store.progress(&book.id),
        (None, None) => 0.0,
    };

    let session = ReaderSession::load(&args.epub_file, stored, &config)?;

    if args.chapters {
        display_chapters(&session);
    }

    if args.page {
        display_page(&session);
    }

    if let Some(store) = progress_store.as_mut() {
        let event = session.close();
        store.apply(&event)?;
        println!("\n💾 进度已保存: {:.4}", event.fraction);
    }

    Ok(())
}

/// 列出压缩包中的所有条目
fn display_entries(path: &Path) -> Result<()> {
    let mut epub = Epub::open(path)?;
    let entries = epub.list_entries()?;

    println!("\n📁 EPUB文件内容:");
    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {}", i + 1, entry);
    }
    println!("  📚 包文档路径: {}", epub.package_path()?);

    Ok(())
}

fn display_chapters(session: &ReaderSession) {
    let pagination = session.pagination();

    println!("\n📑 章节列表 (每页 {} 字符):", pagination.chars_per_page());
    for chapter in session.chapters() {
        println!(
            "  {}. {} [{} 字符, {} 页]",
            chapter.index + 1,
            chapter.title,
            chapter.char_len(),
            pagination.pages_in_chapter(chapter.index)
        );
    }
}

fn display_page(session: &ReaderSession) {
    let chapter = session.current_chapter();

    println!("\n📖 {} - {}", session.chapter_label(), chapter.title);
    println!("  {} (进度 {:.4})", session.page_label(), session.progress());
    println!("{}", "━".repeat(40));
    println!("{}", session.page_text());
    println!("{}", "━".repeat(40));
}
