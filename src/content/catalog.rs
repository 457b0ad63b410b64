// Module catalog
// The five textbook units, in reading order

use serde::Serialize;

/// One textbook unit as listed by `GET /api/v1/modules`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub slug: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub chapter_count: u32,
}

pub static MODULES: [ModuleDescriptor; 5] = [
    ModuleDescriptor {
        slug: "01-physical-ai-intro",
        title: "Introduction to Physical AI",
        icon: "🤖",
        description: "Fundamentals of Physical AI, its applications in robotics, and key concepts.",
        chapter_count: 2,
    },
    ModuleDescriptor {
        slug: "02-ros2",
        title: "ROS 2 Fundamentals",
        icon: "🔧",
        description: "Robot Operating System 2 architecture, nodes, topics, and services.",
        chapter_count: 2,
    },
    ModuleDescriptor {
        slug: "03-simulation",
        title: "Simulation Environments",
        icon: "🎮",
        description: "Using Gazebo, Isaac Sim for testing robotics applications.",
        chapter_count: 1,
    },
    ModuleDescriptor {
        slug: "04-isaac",
        title: "NVIDIA Isaac Platform",
        icon: "🎯",
        description: "Leveraging NVIDIA Isaac for robot development.",
        chapter_count: 1,
    },
    ModuleDescriptor {
        slug: "05-vla",
        title: "Vision-Language-Action Systems",
        icon: "🧠",
        description: "Advanced multimodal AI systems for intelligent behavior.",
        chapter_count: 1,
    },
];
