use super::CorpusRecord;

// (collection, id, title, text)
const SEED: &[(&str, &str, &str, &str)] = &[
    (
        "academic",
        "1",
        "Introduction to Machine Learning",
        "Machine learning is a branch of artificial intelligence and computer science which \
         focuses on the use of data and algorithms to imitate the way that humans learn, \
         gradually improving its accuracy.",
    ),
    (
        "academic",
        "2",
        "Understanding Climate Change",
        "Climate change refers to long-term shifts in temperatures and weather patterns. These \
         shifts may be natural, but since the 1800s, human activities have been the main driver \
         of climate change, primarily due to the burning of fossil fuels.",
    ),
    (
        "academic",
        "3",
        "The Impact of Social Media",
        "Social media has revolutionized communication and has significant implications for how \
         people interact, consume information, and engage with the world around them.",
    ),
    (
        "academic",
        "4",
        "Modern Web Development Techniques",
        "Modern web development encompasses a variety of technologies and methodologies \
         including responsive design, progressive web apps, and component-based architecture.",
    ),
    (
        "academic",
        "5",
        "The Ethics of Artificial Intelligence",
        "As AI systems become more autonomous and sophisticated, ethical considerations \
         surrounding their design, implementation, and regulation have become increasingly \
         important.",
    ),
    (
        "research",
        "1",
        "Advances in Neural Networks",
        "Neural networks have revolutionized machine learning by mimicking the way the human \
         brain works. This paper explores recent advancements in neural network architectures \
         and their applications.",
    ),
    (
        "research",
        "2",
        "Climate Change: Current Evidence and Future Projections",
        "This paper presents an analysis of current evidence for climate change and provides \
         projections for future climate scenarios based on various emissions pathways.",
    ),
    (
        "research",
        "3",
        "Foundations of Statistical Learning",
        "Machine learning is a branch of artificial intelligence and computer science which \
         focuses on the use of data and algorithms to imitate the way that humans learn, \
         gradually improving its accuracy. This survey reviews supervised, unsupervised and \
         reinforcement settings.",
    ),
    (
        "educational",
        "1",
        "Introduction to Programming",
        "Programming is the process of creating a set of instructions that tell a computer how \
         to perform a task. Programming can be done using a variety of computer programming \
         languages.",
    ),
    (
        "educational",
        "2",
        "Basic Chemistry Concepts",
        "Chemistry is the scientific study of matter and its properties, the changes it \
         undergoes, and the energy involved in these processes.",
    ),
    (
        "assignments",
        "1",
        "Understanding Machine Learning",
        "Machine learning is a method of data analysis that automates analytical model \
         building. It is a branch of artificial intelligence based on the idea that systems can \
         learn from data, identify patterns and make decisions with minimal human intervention.",
    ),
    (
        "assignments",
        "2",
        "Global Warming and its Effects",
        "Climate change refers to long-term shifts in temperatures and weather patterns. These \
         shifts may be natural, but since the 1800s, human activities have been the main driver \
         of climate change, primarily due to the burning of fossil fuels.",
    ),
    (
        "assignments",
        "3",
        "Web Development Fundamentals",
        "Modern web development encompasses a variety of technologies and methodologies \
         including responsive design, progressive web apps, and component-based architecture.",
    ),
    (
        "books",
        "1",
        "The History of Computing",
        "The history of computing is longer than the history of computing hardware and modern \
         computing technology and includes the history of methods intended for pen and paper or \
         for chalk and slate, with or without the aid of tables.",
    ),
    (
        "books",
        "2",
        "Understanding Artificial Intelligence",
        "Artificial intelligence (AI) is intelligence demonstrated by machines, as opposed to \
         the natural intelligence displayed by humans or animals.",
    ),
];

pub(super) fn records() -> Vec<CorpusRecord> {
    SEED.iter()
        .map(|&(collection, id, title, text)| CorpusRecord {
            id: id.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            collection: collection.to_string(),
        })
        .collect()
}
